pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::controller::ChatController;
pub use dispatcher::create_command_registry;

pub struct ChatState {
    pub controller: ChatController,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(controller: ChatController) -> Self {
        Self {
            controller,
            should_continue: true,
        }
    }
}
