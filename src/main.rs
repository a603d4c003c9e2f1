use colored::Colorize;
use std::error::Error;
use std::io::{self, BufRead, Write};
use subnet_planner::cmd::parse_command;
use subnet_planner::config::{Config, OutputFormat};
use subnet_planner::output::{print_csv, print_json};
use subnet_planner::shell::{Reply, Session};

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    if let Err(e) = log4rs::init_file(&config.log_config, Default::default()) {
        eprintln!(
            "{} logging disabled, cannot load {}: {e}",
            "WARN".yellow(),
            config.log_config.display()
        );
    }
    log::info!("#Start main() {:?}", config);

    let mut session = Session::new(config);
    let stdin = io::stdin();
    print_prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => {
                print_prompt()?;
                continue;
            }
            Err(e) => {
                println!("{} {e}", "ERR".red());
                print_prompt()?;
                continue;
            }
        };
        match session.execute(command) {
            Ok(Reply::Quit) => break,
            Ok(Reply::Lines(lines)) => lines.iter().for_each(|l| println!("{l}")),
            Ok(Reply::Table(OutputFormat::Csv)) => print_csv(&session.state.rows()),
            Ok(Reply::Table(OutputFormat::Json)) => print_json(&session.state.rows())?,
            Err(e) if e.is_internal() => println!("{} {e} (partition reset)", "ERR".on_red()),
            Err(e) => println!("{} {e}", "ERR".red()),
        }
        print_prompt()?;
    }

    log::info!("#End main()");
    Ok(())
}

fn print_prompt() -> io::Result<()> {
    print!("{} ", "subnet>".blue());
    io::stdout().flush()
}
