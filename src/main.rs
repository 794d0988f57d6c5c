// ABOUTME: REPL and script-runner driver binary for the Monkey language interpreter

use clap::Parser as ClapParser;
use monkey::config::{PROMPT, VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use monkey::env::Environment;
use monkey::error::MonkeyError;
use monkey::eval_source;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::path::PathBuf;
use std::rc::Rc;

/// A tree-walking interpreter for the Monkey language
#[derive(ClapParser, Debug)]
#[command(name = "monkey")]
#[command(version = VERSION)]
#[command(about = "A tree-walking interpreter for the Monkey language")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let env = Environment::new();
    let macro_env = Environment::new();

    if let Some(script_path) = args.script {
        run_script(&script_path, &env, &macro_env)?;
        return Ok(());
    }

    run_repl(&env, &macro_env)
}

/// Executes a whole script file, printing each parse/eval error it hits and
/// propagating the first one so the process exits non-zero.
fn run_script(
    path: &PathBuf,
    env: &Rc<Environment>,
    macro_env: &Rc<Environment>,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path).map_err(|source| MonkeyError::ScriptRead {
        path: path.display().to_string(),
        source,
    })?;

    match eval_source(&contents, env, macro_env) {
        Ok(value) => {
            if !matches!(value, monkey::object::Value::Null) {
                println!("{}", value.inspect());
            }
            Ok(())
        }
        Err(MonkeyError::Parse(messages)) => {
            eprintln!("{}", messages);
            Err(MonkeyError::Parse(messages).into())
        }
        Err(other) => Err(other.into()),
    }
}

fn run_repl(env: &Rc<Environment>, macro_env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = Editor::<(), rustyline::history::DefaultHistory>::with_config(config)
        .map_err(|e| MonkeyError::ReplInit(e.to_string()))?;

    let history_file = ".monkey_history";
    let _ = rl.load_history(history_file);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                if matches!(line.trim(), "quit" | "exit") {
                    println!("Goodbye!");
                    break;
                }

                match eval_source(&line, env, macro_env) {
                    Ok(value) => println!("=> {}", value.inspect()),
                    Err(MonkeyError::Parse(messages)) => {
                        println!("Woops! We ran into some monkey business here!");
                        println!(" parser errors:");
                        for message in messages.lines() {
                            println!("\t{}", message);
                        }
                    }
                    Err(other) => eprintln!("{}", other),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("{}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}
