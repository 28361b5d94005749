//! Interactive prompt: read a line, parse it, read the tree into a value,
//! evaluate against the single global environment, print the result, loop.
//! Parse diagnostics print and continue; the session ends on `exit`,
//! Ctrl+C or Ctrl+D.

use qlisp::ast::Value;
use qlisp::{evaluator, parser, reader};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::process;

fn main() {
    println!("qlisp Version {}", env!("CARGO_PKG_VERSION"));
    println!("Type exit or press Ctrl+C to exit");
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Could not initialize line editor: {e}");
            process::exit(1);
        }
    };
    let mut env = evaluator::default_env();

    loop {
        match rl.readline("qlisp> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                let tree = match parser::parse(line) {
                    Ok(tree) => tree,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };

                let result = evaluator::eval(&mut env, reader::read(&tree));
                let should_exit = matches!(&result, Value::Fun { name: "exit", .. });
                println!("{result}");
                if should_exit {
                    break;
                }
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                break;
            }
            Err(e) => {
                eprintln!("Error: {e:?}");
                break;
            }
        }
    }
}
