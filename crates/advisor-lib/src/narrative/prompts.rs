//! Prompt and summary text builders

use super::NarrativeContext;
use crate::models::MigrationRecommendation;
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = "\
You are an expert Azure migration architect with deep knowledge of:
1. On-premises infrastructure assessment
2. Azure services and SKU recommendations
3. Cost optimization strategies
4. Security and compliance requirements
5. Migration best practices

Always provide practical, actionable recommendations with clear justifications.
Focus on cost optimization while maintaining performance and security.
Consider high availability and disaster recovery requirements.";

/// Example follow-up questions offered after an analysis
pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "What about security considerations?",
    "Can you break down the costs?",
    "What migration risks should I know about?",
    "Show me the detailed migration timeline",
];

/// User prompt for a follow-up question about a finished analysis
pub fn follow_up_prompt(question: &str, ctx: &NarrativeContext) -> String {
    format!(
        "Based on the previous analysis for {name}, please answer this follow-up question:\n\
         \n\
         QUESTION: {question}\n\
         \n\
         CONTEXT FROM PREVIOUS ANALYSIS:\n\
         - Application: {name}\n\
         - Servers: {servers}\n\
         - Total cores: {cores}\n\
         - Total memory: {memory}GB\n\
         - Migration Complexity: {complexity}\n\
         - Estimated Cost: ${monthly:.2}/month\n\
         - Timeline: {timeframe}\n\
         - Target region: {region}\n\
         \n\
         Please provide a detailed, specific answer based on this application's context. \
         If the question is about costs, provide breakdowns. If about timeline, provide phases. \
         If about risks, be specific to this application's characteristics.\n",
        name = ctx.application_name,
        question = question,
        servers = ctx.server_count,
        cores = ctx.total_cores,
        memory = ctx.total_memory_gb,
        complexity = ctx.complexity,
        monthly = ctx.monthly_cost,
        timeframe = ctx.estimated_timeframe,
        region = ctx.region,
    )
}

/// Markdown summary of a recommendation
pub fn analysis_summary(rec: &MigrationRecommendation) -> String {
    let mut out = String::new();
    let aggregates = rec.current_state.aggregates;

    let _ = writeln!(out, "**Current State:**");
    let _ = writeln!(out, "- Servers: {}", rec.current_state.total_servers);
    let _ = writeln!(out, "- Total Cores: {}", aggregates.total_cores);
    let _ = writeln!(out, "- Total Memory: {}GB", aggregates.memory_gb());
    out.push('\n');

    let _ = writeln!(out, "**Azure Recommendations:**");
    let _ = writeln!(out, "- Migration Complexity: {}", rec.complexity.overall);
    let _ = writeln!(
        out,
        "- Estimated Timeline: {}",
        rec.complexity.estimated_timeframe
    );
    let _ = writeln!(
        out,
        "- Monthly Cost Estimate: ${:.2}",
        rec.costs.total_monthly
    );
    let _ = writeln!(out, "- Target Region: {}", rec.target_state.region);
    out.push('\n');

    let _ = writeln!(out, "**Ask me questions like:**");
    for question in SUGGESTED_QUESTIONS {
        let _ = writeln!(out, "- \"{}\"", question);
    }

    out
}

/// Headline plus summary, as returned by the analyze endpoint
pub fn analysis_message(rec: &MigrationRecommendation) -> String {
    format!(
        "**Analysis Complete for {}**\n\n{}",
        rec.application_name,
        analysis_summary(rec)
    )
}
