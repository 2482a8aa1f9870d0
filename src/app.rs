use crate::cli::Args;
use crate::commands::{ChatState, dispatcher::CommandDispatcher};
use crate::controller::ChatController;
use crate::core::error::ChatError;
use crate::display::{self, ThinkingIndicator};
use crate::input;
use is_terminal::IsTerminal;
use std::io::{self, Read};

pub struct Application {
    pub args: Args,
    pub state: ChatState,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(args: Args, controller: ChatController, command_dispatcher: CommandDispatcher) -> Self {
        Self {
            args,
            state: ChatState::new(controller),
            command_dispatcher,
        }
    }

    pub async fn run(&mut self) -> Result<(), ChatError> {
        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        match one_shot_query(self.args.query.as_deref(), context) {
            Some(query) => self.handle_one_shot(&query).await,
            None => self.handle_chat_mode().await,
        }
    }

    async fn handle_one_shot(&mut self, query: &str) -> Result<(), ChatError> {
        let controller = &mut self.state.controller;
        let Some(text) = controller.begin_turn(query) else {
            return Err(ChatError::Input("No query provided".to_string()));
        };

        let indicator = ThinkingIndicator::start();
        let result = controller.request_reply(&text).await;
        indicator.finish();

        // The process exits right after, so a failure is returned as-is
        // instead of going through the fallback reply.
        let reply = result?;
        display::display_markdown(&reply);
        controller.finish_turn(Ok(reply));
        Ok(())
    }

    async fn handle_chat_mode(&mut self) -> Result<(), ChatError> {
        display::display_header(self.state.controller.client().model());
        display::display_transcript(self.state.controller.transcript());

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        while self.state.should_continue {
            let Some(line) = input::read_input(&mut editor)? else {
                break;
            };

            if let Some(result) = self.command_dispatcher.dispatch_line(&line, &mut self.state) {
                match result {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(e) => eprintln!("Error executing command: {}", e),
                }
                continue;
            }

            self.run_turn(&line).await;
        }

        input::save_history(&mut editor)?;
        Ok(())
    }

    /// One interactive turn. Ctrl-C while waiting abandons the request, and
    /// anything typed meanwhile is thrown away.
    async fn run_turn(&mut self, line: &str) {
        let controller = &mut self.state.controller;
        let Some(text) = controller.begin_turn(line) else {
            return;
        };
        if let Some(user) = controller.transcript().messages().iter().rev().nth(1) {
            display::display_message(user);
        }

        let indicator = ThinkingIndicator::start();
        let result = controller
            .request_reply_until(&text, tokio::signal::ctrl_c())
            .await;
        indicator.finish();
        input::discard_pending_input();

        if let Some(outcome) = controller.finish_turn(result) {
            display::display_message(&outcome.reply);
            if let Some(notice) = &outcome.notice {
                display::display_notification(notice);
            }
        }
    }
}

/// Combines the positional query with piped input. `None` starts an
/// interactive session.
fn one_shot_query(query: Option<&str>, piped: Option<String>) -> Option<String> {
    let piped = piped.filter(|text| !text.trim().is_empty());
    match (query, piped) {
        (Some(query), Some(context)) => Some(format!("<pipe>{}</pipe>\n\n{}", context, query)),
        (None, Some(context)) => Some(context),
        (Some(query), None) => Some(query.to_string()),
        (None, None) => None,
    }
}
