use console::Style;
use ccdc_core::pipeline::config::ExtractConfig;
use ccdc_core::pipeline::ExtractionSummary;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    warning: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            warning: Style::new().yellow().bold(),
        }
    }
}

pub fn print_extract_summary(config: &ExtractConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("CCDC Extraction"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!();

    // Model layout
    println!("  {}", s.header.apply_to("Model"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Bands"),
        s.value.apply_to(config.layout.bands.join(", "))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Date field"),
        s.value.apply_to(&config.layout.millis_field)
    );
    match config.layout.metadata_fields {
        Some(ref fields) => println!(
            "    {:<12}{}",
            s.label.apply_to("Metadata"),
            s.value.apply_to(fields.join(", "))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Metadata"),
            s.disabled.apply_to("all sample fields")
        ),
    }
    println!();

    // Selection
    println!("  {}", s.header.apply_to("Selection"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Policy"),
        s.method.apply_to(&config.selection)
    );
    println!();

    // Export
    println!("  {}", s.header.apply_to("Export"));
    match config.export.chunk_size {
        Some(n) => println!(
            "    {:<12}{}",
            s.label.apply_to("Chunks"),
            s.value.apply_to(format!("{n} rows"))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Chunks"),
            s.disabled.apply_to("single file")
        ),
    }
    if let Some(p) = config.export.float_precision {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Precision"),
            s.value.apply_to(format!("{p} decimals"))
        );
    }
    if let Some(ref path) = config.export.failures {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Failures"),
            s.path.apply_to(path.display())
        );
    }
    println!();
}

pub fn print_run_summary(summary: &ExtractionSummary) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Read"),
        s.value.apply_to(summary.rows_read)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Written"),
        s.value.apply_to(summary.rows_written)
    );
    if summary.past_last_segment > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Past end"),
            s.warning.apply_to(summary.past_last_segment)
        );
    }
    if summary.unmatched > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("No segment"),
            s.warning.apply_to(summary.unmatched)
        );
    }
    if !summary.failures.is_empty() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Failed"),
            s.warning.apply_to(summary.failures.len())
        );
        for failure in summary.failures.iter().take(5) {
            println!(
                "    {} {}",
                s.label.apply_to(format!("row {}", failure.row)),
                failure.error
            );
        }
    }
    println!();
    for path in &summary.outputs {
        println!("  Output saved to {}", s.path.apply_to(path.display()));
    }
}
