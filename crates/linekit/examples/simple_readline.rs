use linekit::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Type lines; 'exit' or Ctrl-D quits, Ctrl-C discards the line.");

    let mut reader = ReaderBuilder::new().with_prompt("> ").build()?;

    loop {
        match reader.read_line(true) {
            Ok(ReadOutcome::Line(line)) => {
                if line == "exit" {
                    break;
                }
                println!("You typed: {line}");
            }
            Ok(ReadOutcome::Aborted) => {
                println!("(discarded)");
            }
            Err(EditError::EndOfInput) => break,
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        }
    }

    Ok(())
}
