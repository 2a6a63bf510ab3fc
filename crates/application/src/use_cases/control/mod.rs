pub mod apply_control_command;

pub use apply_control_command::ApplyControlCommandUseCase;
