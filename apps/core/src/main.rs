fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match clip_recall_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[clip-recall] {error}");
            eprintln!("{}", clip_recall_core::runtime::USAGE);
            std::process::exit(2);
        }
    };

    if let Err(error) = clip_recall_core::runtime::run_with_options(options) {
        eprintln!("[clip-recall] runtime failed: {error}");
        std::process::exit(1);
    }
}
