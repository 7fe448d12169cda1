use std::io::{self, Write};

use anyhow::Result;
use pcx_core::{Convention, DesignPoint};
use rayon::ThreadPoolBuilder;
use tabwriter::TabWriter;

pub fn configure_threads(threads: &str) {
    let count = if threads.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        threads.parse().unwrap_or_else(|_| num_cpus::get())
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

/// Aligned table of design points, best primary objective first.
pub fn print_points_table<'a, I>(points: I, convention: Convention, limit: Option<usize>) -> Result<()>
where
    I: IntoIterator<Item = &'a DesignPoint>,
{
    let mut writer = TabWriter::new(io::stdout());
    let primary = match convention {
        Convention::Loss => "LOSS_W",
        Convention::Efficiency => "EFFICIENCY",
    };
    writeln!(writer, "{primary}\tVOLUME\tCOST\tTAG")?;
    for point in points.into_iter().take(limit.unwrap_or(usize::MAX)) {
        let value = match convention {
            Convention::Loss => format!("{:.3}", point.primary()),
            Convention::Efficiency => format!("{:.5}", point.primary()),
        };
        writeln!(
            writer,
            "{}\t{:.4}\t{:.2}\t{}",
            value,
            point.volume(),
            point.cost(),
            point.tag().join(" ")
        )?;
    }
    writer.flush()?;
    Ok(())
}
