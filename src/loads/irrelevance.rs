use crate::loads::{LoadLevel, seeded_bytes};

pub const DUPLICATE_PLACEHOLDER: &str = "这是一个用于增加复杂度的重复结构中的占位符文本。";

const NOISE_IMAGE_BYTES: usize = 256;
const NOISE_COMMENT_COUNT: usize = 20;
const FILLER: &str = concat!(
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed non risus. ",
    "Suspendisse lectus tortor, dignissim sit amet, adipiscing nec, ultricies sed, dolor."
);

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Each level nests the previous level's markup one layer deeper.
pub fn add_load(question_text: &str, level: LoadLevel, seed: u64) -> String {
    if level.is_identity() {
        return question_text.to_string();
    }

    let encoded = escape_html(question_text);
    let page = quiz_page(&encoded);
    if level.get() == 1 {
        return page;
    }

    let noise = noise_image_payload(question_text, seed);
    let layout = table_layout(&page, &noise);
    if level.get() == 2 {
        return layout;
    }

    let forum = forum_thread(&layout);
    if level.get() == 3 {
        return forum;
    }

    let noise_block = comment_noise(question_text, seed);
    format!(
        concat!(
            "<div class=\"print-preview-wrapper\">\n",
            "  {noise}\n",
            "  <div class=\"page-a4\">\n",
            "    <div class=\"header-print\">文档打印预览 - 请勿修改</div>\n",
            "    {forum}\n",
            "  </div>\n",
            "  {noise}\n",
            "  <div class=\"page-a4-duplicate-for-layout-testing\" style=\"display:none;\">\n",
            "    <!-- duplicated layout block -->\n",
            "    {duplicate}\n",
            "  </div>\n",
            "  {noise}\n",
            "</div>"
        ),
        noise = noise_block,
        forum = forum,
        duplicate = forum.replace(&encoded, DUPLICATE_PLACEHOLDER),
    )
}

fn quiz_page(encoded_question: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"zh-CN\">\n",
            "<head>\n",
            "  <meta charset=\"UTF-8\">\n",
            "  <title>在线测验平台</title>\n",
            "  <style>\n",
            "    body {{ font-family: \"Helvetica Neue\", Helvetica, Arial, sans-serif; background-color: #f4f4f9; }}\n",
            "    .container {{ max-width: 960px; margin: 20px auto; padding: 15px; background: #fff; border: 1px solid #ddd; }}\n",
            "    .question-box {{ border: 2px dashed #ccc; padding: 20px; margin-top: 15px; }}\n",
            "    .hidden-ad {{ display: none !important; }}\n",
            "  </style>\n",
            "</head>\n",
            "<body>\n",
            "  <div id=\"page-wrapper\">\n",
            "    <header role=\"banner\">\n",
            "      <div class=\"hidden-ad\">ADVERTISEMENT</div>\n",
            "      <h1>欢迎来到在线测验</h1>\n",
            "    </header>\n",
            "    <main id=\"main-content\" role=\"main\">\n",
            "      <!-- question container -->\n",
            "      <div class=\"question-box\" data-question-type=\"multiple-choice\">\n",
            "        <p>{}</p>\n",
            "      </div>\n",
            "    </main>\n",
            "    <script>\n",
            "      // A simple script to track page load. Should be ignored.\n",
            "      const startTime = new Date().getTime();\n",
            "      window.onload = function() {{ console.log(\"Page loaded in: \" + (new Date().getTime() - startTime) + \"ms\"); }};\n",
            "    </script>\n",
            "  </div>\n",
            "</body>\n",
            "</html>"
        ),
        encoded_question
    )
}

fn table_layout(page: &str, noise: &str) -> String {
    format!(
        concat!(
            "<div class=\"app-root\" data-version=\"2.1.0\">\n",
            "  <nav class=\"top-nav\">\n",
            "    <span>首页</span> | <span>关于我们</span> | <span>联系方式</span>\n",
            "  </nav>\n",
            "  <table id=\"layout-table\" border=\"1\" style=\"width:100%; border-collapse: collapse;\">\n",
            "    <tbody>\n",
            "      <tr>\n",
            "        <td style=\"padding: 20px; vertical-align: top;\" class=\"content-cell\">\n",
            "          <h3>请仔细阅读以下内容并作答</h3>\n",
            "          {}\n",
            "        </td>\n",
            "        <td style=\"width: 200px;\" class=\"sidebar-cell\">\n",
            "          <h4>相关资料</h4>\n",
            "          <p>这是一个侧边栏，包含无关信息。</p>\n",
            "          <img alt=\"placeholder\" src=\"data:image/gif;base64,{}\">\n",
            "        </td>\n",
            "      </tr>\n",
            "    </tbody>\n",
            "  </table>\n",
            "</div>"
        ),
        page, noise
    )
}

fn forum_thread(layout: &str) -> String {
    format!(
        concat!(
            "<div id=\"forum-thread-page\">\n",
            "  <div class=\"main-post\" data-post-id=\"54321\">\n",
            "    {}\n",
            "  </div>\n",
            "  <div class=\"comment-section\">\n",
            "    <h3>评论区</h3>\n",
            "    <div class=\"comment\" data-user-id=\"101\"><p>这个题目有点难度！</p></div>\n",
            "    <div class=\"comment\" data-user-id=\"102\"><p>{}</p></div>\n",
            "  </div>\n",
            "  <script>\n",
            "    (function() {{\n",
            "      var config = {{ \"user_id\": 123, \"tracking_enabled\": true }};\n",
            "      function complex_function(a, b) {{ return a * b; }}\n",
            "      console.log(\"Complex UI script loaded.\");\n",
            "    }})();\n",
            "  </script>\n",
            "</div>"
        ),
        layout, FILLER
    )
}

/// Hex rendering of seeded bytes. Hex digits are a subset of the base64
/// alphabet, so the data URI stays well formed.
fn noise_image_payload(question_text: &str, seed: u64) -> String {
    seeded_bytes(seed, "irrelevance-image", question_text, NOISE_IMAGE_BYTES)
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

fn comment_noise(question_text: &str, seed: u64) -> String {
    let bytes = seeded_bytes(seed, "irrelevance-comments", question_text, NOISE_COMMENT_COUNT * 4);
    bytes
        .chunks(4)
        .enumerate()
        .map(|(index, chunk)| {
            let tag = chunk.iter().map(|byte| format!("{:02x}", byte)).collect::<String>();
            format!("<!-- layout-noise-{} {} -->", index, tag)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
