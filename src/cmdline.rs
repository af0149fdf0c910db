use crate::environment::Environment;
use crate::interpreter;
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Signal, Terminal};
use std::rc::Rc;

pub struct Config {
    pub prompt: String,
    /// Highlight errors with ANSI colours.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: String::from("lisp> "),
            color: atty::is(atty::Stream::Stdout),
        }
    }
}

pub fn setup(config: &Config) -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("pecan")?;
    interface.set_prompt(&config.prompt)?;
    interface.set_report_signal(Signal::Interrupt, true);
    Ok(interface)
}

fn report<T: Terminal>(interface: &Interface<T>, config: &Config, error: &interpreter::Error) {
    let message = error.to_string();
    if config.color {
        writeln!(interface, "{}", Red.paint(message)).ok();
    } else {
        writeln!(interface, "{}", message).ok();
    }
}

/// Runs each line through the pipeline against `env` until end of input or
/// an interrupt. A failing line is reported and the loop moves on.
pub fn repl<T: Terminal>(
    interface: &Interface<T>,
    config: &Config,
    env: &Rc<Environment>,
) -> std::io::Result<()> {
    loop {
        match interface.read_line()? {
            ReadResult::Eof | ReadResult::Signal(Signal::Interrupt) => break,
            ReadResult::Signal(sig) => {
                log::debug!("ignoring signal {:?}", sig);
            }
            ReadResult::Input(line) => {
                interface.add_history_unique(line.clone());
                let printed = interpreter::rep_each(&line, env, |value| {
                    writeln!(interface, "{}", value).ok();
                });
                if let Err(e) = printed {
                    report(interface, config, &e);
                }
            }
        }
    }
    writeln!(interface, "\nExiting lisp")?;
    Ok(())
}

/// Starts the interactive front end against a fresh global environment.
pub fn run(config: Config) -> std::io::Result<()> {
    let env = Rc::new(Environment::default());
    let interface = setup(&config)?;
    repl(&interface, &config, &env)
}
