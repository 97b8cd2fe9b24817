pub(crate) mod command;
pub(crate) mod demo;
pub(crate) mod enumerate;
pub(crate) mod listen;
pub(crate) mod output;
pub(crate) mod patterns;
pub(crate) mod send;
pub(crate) mod ui;

pub use self::command::{Args, Command, FakeArgs, LinkArgs, LogLevel, OutputFormat};
pub use self::demo::{DemoArgs, DemoSource};
pub use self::enumerate::EnumerateArgs;
pub use self::listen::ListenArgs;
pub use self::send::SendArgs;
