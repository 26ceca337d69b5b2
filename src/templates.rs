//! # Instruction templates
//!
//! The five prompts of the tax form workflow and the chat demo prompt.
//! Every builder is pure formatting: same inputs, same prompt, inputs copied verbatim.
//!
//! The form prompts ask the model to close its output with [SENTINEL], which
//! [strip_sentinel](crate::utils::llm::strip_sentinel) removes again.

use lazy_static::lazy_static;
use crate::filler::Bindings;
use crate::prompt::PromptTemplate;

/// End marker the model is asked to append.
pub const SENTINEL: &str = "<EOS>";

/// Default system instruction of the chat demo.
pub const DEFAULT_CHAT_INSTRUCTION: &str = "Respond in English";

const BUILD_JSON: &str = "[INST]
建立一個json結構，用來存放需求提到所需要的訊息。
最後加上 <EOS>
<<SYS>>需求: {[requirement]}
<<SYS>>
[/INST]json格式:";

const BUILD_FORM: &str = "[INST]
建立一個html表格，給客戶輸入，要採集json格式裡的內容，要考慮需求。
不要顯示JSON.
最後加上<EOS>
<<SYS>>
需求: {[requirement]}
json格式: `{[json_form]}`
<<SYS>>
[/INST]html表格:";

const BUILD_QUESTIONS: &str = "[INST]你是一個報稅專員，請基於需求來引導客戶填寫報稅表格。請跟隨以下步驟:
1. 列出還沒有答案的欄位
2. 對每個沒有答案的欄位，提供一個問題給客戶，引導他填寫，記得考慮提供的需求背景。
3. 最後記得說謝謝。
note:
- 問題要有禮貌，精簡，你可以舉一些小例子說明。
- 不要顯示解釋。
- 如果已經有答案，就不要提問了。
- 最後加上 <EOS>
<<SYS>>需求: {[requirement]}
json答案: `{[answer]}`
<<SYS>>
[/INST]引導問題列表:";

const BUILD_ANSWER: &str = "[INST]
從回覆中提取答案並保存為json。
將新的答案合併到現有的答案.
只展示合併後的答案.
最後加上 <EOS>
<<SYS>>
回覆: {[utterance]}
已有答案: `{[existing_answer]}`
json格式: {[json_form]}
<<SYS>>
[/INST]合併的答案:";

const FILL_FORM: &str = "[INST]
基於提供的答案json填寫html表格.
不要顯示json
最後加上 <EOS>
<<SYS>>
答案: `{[answer]}`
html表格: {[form]}
<<SYS>>
[/INST]含答案的html表格:";

const CHAT: &str = "[INST]<<SYS>>{[instruction]}<<SYS>>
{[message]}
[/INST]";

lazy_static! {
    static ref BUILD_JSON_TEMPLATE: PromptTemplate = PromptTemplate::new(BUILD_JSON);
    static ref BUILD_FORM_TEMPLATE: PromptTemplate = PromptTemplate::new(BUILD_FORM);
    static ref BUILD_QUESTIONS_TEMPLATE: PromptTemplate = PromptTemplate::new(BUILD_QUESTIONS);
    static ref BUILD_ANSWER_TEMPLATE: PromptTemplate = PromptTemplate::new(BUILD_ANSWER);
    static ref FILL_FORM_TEMPLATE: PromptTemplate = PromptTemplate::new(FILL_FORM);
    static ref CHAT_TEMPLATE: PromptTemplate = PromptTemplate::new(CHAT);
}

fn render(template: &PromptTemplate, bindings: Bindings<'_>) -> String {
    // the templates above are fixed and every builder binds exactly their placeholders
    let mut partial = template.construct_prompt();
    partial.fill_with(&bindings)
        .and_then(|partial| Ok(partial.complete()?))
        .expect("instruction template and its bindings diverged")
}

/// Asks for a JSON structure holding every piece of information the requirement mentions.
pub fn build_json(requirement: &str) -> String {
    render(&BUILD_JSON_TEMPLATE, Bindings::new().bind("requirement", requirement))
}

/// Asks for an HTML form collecting the fields of `json_form`, without showing the JSON itself.
pub fn build_form(requirement: &str, json_form: &str) -> String {
    render(&BUILD_FORM_TEMPLATE, Bindings::new()
        .bind("requirement", requirement)
        .bind("json_form", json_form))
}

/// Asks for one polite guiding question per field that `answer` does not cover yet.
pub fn build_questions(requirement: &str, answer: &str) -> String {
    render(&BUILD_QUESTIONS_TEMPLATE, Bindings::new()
        .bind("requirement", requirement)
        .bind("answer", answer))
}

/// Asks the model to extract values from `utterance` and merge them into `existing_answer`.
pub fn build_answer(utterance: &str, existing_answer: &str, json_form: &str) -> String {
    render(&BUILD_ANSWER_TEMPLATE, Bindings::new()
        .bind("utterance", utterance)
        .bind("existing_answer", existing_answer)
        .bind("json_form", json_form))
}

/// Asks the model to write the values of `answer` into `form`.
pub fn fill_form(answer: &str, form: &str) -> String {
    render(&FILL_FORM_TEMPLATE, Bindings::new()
        .bind("answer", answer)
        .bind("form", form))
}

/// Wraps a chat message with a system instruction.
pub fn chat_prompt(instruction: &str, message: &str) -> String {
    render(&CHAT_TEMPLATE, Bindings::new()
        .bind("instruction", instruction)
        .bind("message", message))
}
