mod cli;
mod output;

fn main() {
    std::process::exit(cli::run());
}
