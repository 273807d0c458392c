pub fn build_decomposition_prompt(query: &str, num_agents: usize) -> String {
    format!(
        concat!(
            "You are a task decomposition expert. Analyze the following complex query and break it down into ",
            "{} distinct, complementary, and specialized thinking styles or sub-tasks that a team of agents ",
            "can work on in parallel. ",
            "Provide your answer ONLY as a JSON list of strings. For example: [\"Style 1\", \"Style 2\"].\n\n",
            "QUERY:\n{}"
        ),
        num_agents, query
    )
}

pub fn build_initial_analysis_prompt(style: &str, query: &str) -> String {
    format!(
        concat!(
            "As an expert with the thinking style '{}', ",
            "provide your initial analysis and solution for the following problem:\n\n{}"
        ),
        style, query
    )
}

pub fn build_refinement_prompt(
    style: &str,
    query: &str,
    memory_json: &str,
    peer_outputs: &[String],
    previous_output: &str,
) -> String {
    format!(
        concat!(
            "You are an expert with the thinking style '{}'. ",
            "You have already provided an initial thought. Now, review the collective memory and the outputs ",
            "from your peers, then provide a refined and improved analysis.\n\n",
            "ORIGINAL PROBLEM:\n{}\n\n",
            "COLLECTIVE MEMORY:\n{}\n\n",
            "PEER OUTPUTS:\n{}\n\n",
            "YOUR PREVIOUS OUTPUT:\n{}\n\n",
            "Provide your refined output:"
        ),
        style,
        query,
        memory_json,
        pretty_list(peer_outputs),
        previous_output
    )
}

pub fn build_synthesis_prompt(query: &str, final_outputs: &[String], memory_json: &str) -> String {
    format!(
        concat!(
            "You are an expert synthesizer. Your task is to generate a final, high-quality answer for the ",
            "original query based on the collective work of a team of agents. ",
            "Adhere strictly to the required JSON output format.\n\n",
            "ORIGINAL QUERY:\n{}\n\n",
            "FINAL AGENT OUTPUTS:\n{}\n\n",
            "FINAL COLLECTIVE MEMORY:\n{}\n\n",
            "Based on all the above information, provide the final answer in the following JSON format:\n",
            "{{\n",
            "  \"answer\": \"Your final answer option (e.g., A, B, C, or D)\",\n",
            "  \"reasoning\": \"Your synthesized, final reasoning process that integrates the best points from the agents.\"\n",
            "}}"
        ),
        query,
        pretty_list(final_outputs),
        memory_json
    )
}

/// Single-shot prompt for the baseline mode. The wording is part of the
/// evaluated condition and must stay stable across runs.
pub fn build_baseline_prompt(question: &str) -> String {
    format!(
        concat!(
            "你是一位顶级的数学解题专家，擅长解决各种高考数学题。请仔细阅读下面的单项选择题，",
            "并提供你的最终答案和详细、严谨的解题步骤。\n",
            "你的回答必须严格遵循以下JSON格式，不要在JSON代码块前后添加任何额外的解释或文本。\n",
            "{{\n",
            "  \"answer\": \"你的答案选项 (例如: A, B, C, or D)\",\n",
            "  \"reasoning\": \"你得出这个答案的详细推理过程和解题步骤分析。\"\n",
            "}}\n",
            "--- 问题开始 ---\n",
            "{}\n",
            "--- 问题结束 ---\n",
            "请提供你的JSON格式的回答:"
        ),
        question
    )
}

fn pretty_list(items: &[String]) -> String {
    serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
}
