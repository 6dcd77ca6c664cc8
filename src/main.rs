fn main() -> anyhow::Result<()> {
    mandarin_mfa_prep_lib::run()
}
