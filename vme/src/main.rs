#[macro_use]
extern crate clap;

use clap::Arg;
use std::process;
use util::console;

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("FILES")
                .help("The source files to execute, in the given order")
                .required(true)
                .multiple(true),
        )
        .get_matches();

    let files: Vec<&str> = matches.values_of("FILES").unwrap().collect();
    process::exit(run(&files));
}

fn run(files: &[&str]) -> i32 {
    let mut prog = match vme::assemble_files(files) {
        Ok(prog) => prog,
        Err(err) => {
            console::error(&err);
            return 1;
        }
    };

    match vme::run(&mut prog) {
        Ok(result) => {
            let _ = console::print(&format!("{}\n", result));
            console::clean_stdout();
            0
        }
        Err(err) => {
            console::error(&err);
            -1
        }
    }
}
