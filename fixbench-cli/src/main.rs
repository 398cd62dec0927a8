fn main() -> anyhow::Result<()> {
    fixbench_cli::run()
}
