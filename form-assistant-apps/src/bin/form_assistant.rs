use anyhow::Result;
use form_assistant::assistant::{FormAssistant, FormEvent};
use form_assistant::config;
use form_assistant::session::SessionState;
use form_assistant::utils::llm::openai::CompletionModel;
use form_assistant::utils::postprocess::json::display_json;
use form_assistant::utils::printing::{print_code, print_message};
use form_assistant_apps::{init, Command, Input, FORM_HELP};
use log::error;
use termimad::MadSkin;

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    let config = config::form_from_env();
    let assistant = FormAssistant::with_options(CompletionModel::new(&config.model), config.options);
    let skin = MadSkin::default();
    skin.print_text("# 報稅助手 with watsonx.ai 💬\n");
    skin.print_text(FORM_HELP);

    let mut state = SessionState::default();
    let mut input = Input::stdin();
    while let Some(line) = input.next("> ").await? {
        let event = match Command::parse(&line) {
            Command::Event(event) => event,
            Command::ShowForm => {
                print_code(&skin, "html", &state.filled_form);
                continue;
            }
            Command::ShowAnswer => {
                print_code(&skin, "json", &display_json(&state.answer));
                continue;
            }
            Command::Help => {
                skin.print_text(FORM_HELP);
                continue;
            }
            Command::Quit => break,
        };

        let status = match &event {
            FormEvent::BuildForm => Some("正在建立表格..."),
            FormEvent::BuildQuestions => Some("正在生成引導問題..."),
            FormEvent::UserReply(_) => Some("正在提取答案..."),
            FormEvent::SetRequirement(_) | FormEvent::Reset => None,
        };
        if let Some(status) = status {
            skin.print_text(&format!("*{}*", status));
        }

        let shown = state.transcript.len();
        let show_form = matches!(event, FormEvent::BuildForm);
        let show_answer = matches!(event, FormEvent::UserReply(_));
        match assistant.handle(&state, event).await {
            Ok(next) => state = next,
            Err(err) => {
                error!("event failed: {}", err);
                skin.print_text(&format!("**error**: {}", err));
                continue;
            }
        }
        for message in state.transcript.messages().iter().skip(shown) {
            print_message(&skin, message);
        }
        if show_form {
            print_code(&skin, "html", &state.filled_form);
        }
        if show_answer {
            print_code(&skin, "json", &display_json(&state.answer));
        }
    }
    Ok(())
}
