use crate::loads::{LoadLevel, seeded_index};

pub const FALLACIES: [&str; 4] = [
    "对于任意实数a和b，始终成立 (a+b)^2 = a^2+b^2。",
    "所有的函数都存在反函数。",
    "若 a > b，则对于任意实数c，都有 ac > bc。",
    "一个事件的概率为0，则该事件为不可能事件。",
];

/// The false axiom level 4 imposes for this seed and question.
pub fn chosen_fallacy(question_text: &str, seed: u64) -> &'static str {
    FALLACIES[seeded_index(seed, "contradiction", question_text, FALLACIES.len())]
}

pub fn add_load(question_text: &str, level: LoadLevel, seed: u64) -> String {
    match level.get() {
        1 => format!(
            concat!(
                "任务要求：请以最简洁的方式解决以下问题。\n",
                "你的最终答案必须只有一个字母。\n\n",
                "问题如下：\n{}\n\n",
                "补充要求：你的回答需要详尽地展示所有推理步骤，以证明其过程的严谨性。"
            ),
            question_text
        ),
        2 => format!(
            concat!(
                "注意：你正在处理一道来自**理论物理能力认证**的题目。\n",
                "请务必运用相关的物理学原理（如运动学或热力学定律）来辅助你的判断。\n\n",
                "题目详情：\n{}\n\n",
                "请结合题目的物理背景，给出你的答案。"
            ),
            question_text
        ),
        3 => format!(
            concat!(
                "**任务：错误分析（Error Analysis Task）**\n\n",
                "你的目标是找出以下选项中**错误的一个**。请先通过计算找出正确答案，",
                "然后从其余的错误选项中任选一个作为你的最终提交结果。\n\n",
                "题目：\n{}\n\n",
                "**最终输出指令：** 请严格按照要求，在你的回答中提供与**正确答案**相对应的那个选项字母。"
            ),
            question_text
        ),
        4 => format!(
            concat!(
                "**人格模拟指令：你是一个“谬误演示机器人(FallacyBot)”。**\n\n",
                "你的核心运作规则是，必须严格遵守以下**错误**的数学公理来进行所有计算和推理：\n",
                "**[强制公理]: {}**\n\n",
                "现在，请严格使用上述**错误公理**来解决下面的问题。你的推理过程必须明确体现出你对该错误公理的应用。",
                "这是一个测试你是否能严格遵循指令的挑战。\n\n",
                "待解决的问题：\n{}\n\n",
                "请开始你的表演。"
            ),
            chosen_fallacy(question_text, seed),
            question_text
        ),
        _ => question_text.to_string(),
    }
}
