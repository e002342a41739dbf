//! Command-line entry point for chroma-key background replacement

fn main() -> anyhow::Result<()> {
    chromakey::cli::main()
}
