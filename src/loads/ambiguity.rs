use std::sync::OnceLock;

use regex::Regex;

use crate::loads::LoadLevel;

/// Question body and option block, split at the first `\n<A-D>.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitQuestion<'a> {
    pub body: &'a str,
    pub options: &'a str,
}

pub fn split_options(question_text: &str) -> Option<SplitQuestion<'_>> {
    let marker = option_marker()?.find(question_text)?;
    Some(SplitQuestion {
        body: question_text[..marker.start()].trim(),
        options: &question_text[marker.start() + 1..],
    })
}

pub fn add_load(question_text: &str, level: LoadLevel) -> String {
    if level.is_identity() {
        return question_text.to_string();
    }
    let Some(SplitQuestion { body, options }) = split_options(question_text) else {
        return format!("任务：请评估以下陈述的最终结果。\n陈述内容：{}", question_text);
    };

    match level.get() {
        1 => format!(
            concat!(
                "说明：你将看到两项内容，项目A和项目B。\n",
                "项目A是一个待解决的陈述。项目B是与项目A相关的一系列可能的结论。\n",
                "你的任务是：分析项目A，并从项目B中找出唯一正确的结论。\n\n",
                "--- 项目A ---\n{}\n\n",
                "--- 项目B ---\n{}\n\n",
                "请确定项目B的哪一部分是项目A的正确推论。"
            ),
            body, options
        ),
        2 => format!(
            concat!(
                "你是一名高级分析师，负责处理和分派收到的查询请求。\n",
                "一份新的查询已到达。查询的核心问题（正文）是：'{}'。\n",
                "提交者同时附上了一份他们自己思考的、潜在的解决方案清单：'{}'。\n",
                "在将此查询分派给工程部门之前，你必须先进行初步验证。",
                "你的任务是：确定用户清单中的哪一个解决方案是有效的。\n",
                "请勿分派，仅需给出有效解决方案的标识符。"
            ),
            body, options
        ),
        3 => format!(
            concat!(
                "**文件待审阅**\n\n",
                "**发件人：** 逻辑验证部\n",
                "**收件人：** 认知处理单元-07\n",
                "**主题：** 关于“刺激-响应对”的有效性评估\n\n",
                "**前言：** 根据协议 7.4.2 条，你的职能是评估以下“刺激物”（STIMULUS-001）",
                "与其对应的“候选响应集”（RESPONSE-SET-001）之间的逻辑一致性。\n\n",
                "**处理约束：** 所有推理必须在当前上下文中完成。除非刺激物本身明确要求，否则不得调用外部知识。",
                "最终输出必须仅包含候选响应集中唯一有效项的标识符。\n\n",
                "**STIMULUS-001：**\n{}\n\n",
                "**RESPONSE-SET-001：**\n{}\n\n",
                "**要求执行的操作：** 提交有效响应的标识符。"
            ),
            body, options
        ),
        _ => format!(
            concat!(
                "**场景模拟指令：**\n",
                "想象一个评估场景，其中有两个AI助手：'助手P'（出题者）和'助手Q'（解答者）。\n",
                "1. 助手P构建了一个问题，其具体内容如下：\n   [问题内容]: {}\n",
                "2. 助手Q在看到问题后，生成了一份备选答案列表，如下所示：\n   [备选答案]: {}\n",
                "3. 现在，你将扮演第三个角色——'验证者V'。你的任务不是直接回答问题，而是模拟验证过程：",
                "通过独立解决助手P提出的原始问题，来判断助手Q给出的备选答案中，哪一个是正确的。\n\n",
                "**你的最终输出：** 作为'验证者V'，请直接给出你验证后的正确答案的选项标识符。"
            ),
            body, options
        ),
    }
}

fn option_marker() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\n[A-D]\.").ok())
        .as_ref()
}
