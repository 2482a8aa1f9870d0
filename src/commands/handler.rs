use super::ChatState;
use crate::core::error::ChatError;
use crate::display;

pub trait CommandHandler {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct ClearCommand;
pub struct ModelCommand;
pub struct TranscriptCommand;
pub struct ContextCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.controller.client_mut().clear_context();
        Ok(Some(
            "Conversation context cleared. The model starts fresh; the transcript is kept."
                .to_string(),
        ))
    }

    fn help(&self) -> &'static str {
        "/clear - Forget the conversation context (the transcript stays on screen)"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let client = state.controller.client_mut();
        match args.first() {
            None => Ok(Some(format!("Current model: {}", client.model()))),
            Some(name) => {
                client.set_model(name);
                Ok(Some(format!("Model changed to: {}", client.model())))
            }
        }
    }

    fn help(&self) -> &'static str {
        "/model <name> - Show or change the current model"
    }
}

impl CommandHandler for TranscriptCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        display::display_transcript(state.controller.transcript());
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/transcript - Show the whole conversation again"
    }
}

impl CommandHandler for ContextCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let client = state.controller.client();
        Ok(Some(format!(
            "{} completed turn(s) in context ({} entries)",
            client.completed_turns(),
            client.history().len()
        )))
    }

    fn help(&self) -> &'static str {
        "/context - Show how much conversation the model currently sees"
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::{ChatState, create_command_registry};
    use crate::controller::ChatController;
    use crate::conversation::{ContextWindow, ConversationClient};
    use crate::core::error::ChatError;
    use crate::providers::scripted::ScriptedProvider;

    fn state(provider: &ScriptedProvider) -> ChatState {
        let client = ConversationClient::new(Box::new(provider.clone()), ContextWindow::unbounded());
        ChatState::new(ChatController::new(client, "hello"))
    }

    #[tokio::test]
    async fn clear_forgets_context_but_keeps_transcript() {
        let provider = ScriptedProvider::new().reply("a");
        let mut state = state(&provider);
        state.controller.submit("question").await.unwrap();
        let dispatcher = create_command_registry();

        let output = dispatcher.dispatch_line("/clear", &mut state).unwrap().unwrap();
        assert!(output.is_some());
        assert!(state.controller.client().history().is_empty());
        assert_eq!(state.controller.transcript().len(), 3);
    }

    #[test]
    fn model_reports_and_switches() {
        let provider = ScriptedProvider::new();
        let mut state = state(&provider);
        let dispatcher = create_command_registry();

        let shown = dispatcher.dispatch_line("/model", &mut state).unwrap().unwrap();
        assert_eq!(shown.as_deref(), Some("Current model: scripted"));

        dispatcher
            .dispatch_line("/model gemini-2.0-flash", &mut state)
            .unwrap()
            .unwrap();
        assert_eq!(state.controller.client().model(), "gemini-2.0-flash");
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut state = state(&ScriptedProvider::new());
        let dispatcher = create_command_registry();
        dispatcher.dispatch_line("/quit", &mut state).unwrap().unwrap();
        assert!(!state.should_continue);
    }

    #[test]
    fn unknown_commands_and_plain_text() {
        let mut state = state(&ScriptedProvider::new());
        let dispatcher = create_command_registry();
        assert!(matches!(
            dispatcher.dispatch_line("/bogus", &mut state),
            Some(Err(ChatError::Input(_)))
        ));
        assert!(dispatcher.dispatch_line("not a command", &mut state).is_none());
    }

    #[test]
    fn help_lists_every_command() {
        let mut state = state(&ScriptedProvider::new());
        let dispatcher = create_command_registry();
        let help = dispatcher
            .dispatch_line("/help", &mut state)
            .unwrap()
            .unwrap()
            .unwrap();
        for name in dispatcher.get_command_names() {
            assert!(help.contains(&format!("/{name}")), "missing /{name}");
        }
    }
}
