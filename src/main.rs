fn main() -> Result<(), Box<dyn std::error::Error>> {
    parley::cli::main()
}
