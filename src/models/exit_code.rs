#[derive(Debug, Default, PartialEq)]
pub struct ExitStatus {
    pub code: i32,
    pub reason: String,
}

impl ExitStatus {
    pub fn new(code: ExitCode, reason: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            reason: reason.into(),
        }
    }
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitCode {
    GameOver = 0,
    Interrupted = 1,

    InvalidConfig = 10,
}
