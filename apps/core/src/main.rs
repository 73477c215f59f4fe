fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match photocull_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[photocull-core] {error}");
            eprintln!("[photocull-core] try --help for usage");
            std::process::exit(2);
        }
    };

    if let Err(error) = photocull_core::runtime::run_with_options(options) {
        eprintln!("[photocull-core] runtime failed: {error}");
        std::process::exit(1);
    }
}
