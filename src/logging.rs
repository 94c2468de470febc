use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Initialize the logger: local timestamps, stdout, `Info` and above.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = Builder::new()
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .try_init();
}
