fn main() -> anyhow::Result<()> {
    balestra::cli::run()
}
