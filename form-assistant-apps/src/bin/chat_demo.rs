use anyhow::Result;
use form_assistant::chat::ChatSession;
use form_assistant::config;
use form_assistant::session::{Role, Transcript};
use form_assistant::utils::llm::openai::CompletionModel;
use form_assistant_apps::{init, Input, ReplyOutput};
use log::error;
use termimad::MadSkin;

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    let config = config::chat_from_env();
    let chat = ChatSession::with_instruction(CompletionModel::new(&config.model), config.instruction);
    let skin = MadSkin::default();
    skin.print_text("# it is a demo chatbot with watsonx\n\n**system**\n\nHello 👋, lets chat with watsonx\n");

    let mut transcript = Transcript::default();
    let mut input = Input::stdin();
    while let Some(line) = input.next("Say something > ").await? {
        skin.print_text(&format!("**{}**\n", Role::Agent.as_str()));
        let mut output = ReplyOutput::start();
        let reply = chat.user_message_with(&transcript, &line, |chunk| output.push(chunk)).await;
        output.finish();
        match reply {
            Ok(next) => transcript = next,
            Err(err) => {
                error!("message failed: {}", err);
                skin.print_text(&format!("**error**: {}", err));
            }
        }
    }
    Ok(())
}
