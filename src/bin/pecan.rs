use pecan::cmdline;

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();
    cmdline::run(cmdline::Config::default())
}
