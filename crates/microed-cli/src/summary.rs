use console::Style;
use microed_core::acquisition::AcquisitionProperties;
use microed_core::frame::AlignmentOffset;
use microed_core::pipeline::config::PipelineConfig;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
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
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();
    print_title(&s, "Drift Correction");

    let shape = if config.input.len() == 1 {
        "stack"
    } else {
        "single images"
    };
    println!(
        "  {:<14}{} {}",
        s.label.apply_to("Input"),
        s.value.apply_to(config.input.len()),
        s.method.apply_to(format!("file(s), {}", shape))
    );
    for path in &config.input {
        println!("  {:<14}{}", "", s.path.apply_to(path.display()));
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Alignment"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Reference"),
        s.value.apply_to("frame 0")
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Method"),
        s.method.apply_to("phase correlation, bilinear resampling")
    );
    if config.alignment.parallel {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Threads"),
            s.method.apply_to("parallel")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Threads"),
            s.disabled.apply_to("single")
        );
    }
    println!();
}

pub fn print_offsets(offsets: &[AlignmentOffset]) {
    let s = Styles::new();
    println!("  {}", s.header.apply_to("Estimated drift"));
    for (i, offset) in offsets.iter().enumerate() {
        println!(
            "    {:<6}{}",
            s.label.apply_to(i),
            s.value
                .apply_to(format!("dx={:+.2}  dy={:+.2}", offset.dx, offset.dy))
        );
    }
    println!();
}

pub fn print_plan(properties: &AcquisitionProperties) {
    let s = Styles::new();
    print_title(&s, "Tilt Series Plan");

    println!(
        "  {:<18}{}",
        s.label.apply_to("Camera"),
        s.value.apply_to(properties.camera_name())
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Sampling"),
        s.method.apply_to(properties.sampling())
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Readout"),
        s.value.apply_to(format!(
            "code {}, binning {}",
            properties.sampling().readout_code(),
            properties.sampling().binning()
        ))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Integration time"),
        s.value.apply_to(format!("{} s", properties.integration_time()))
    );
    match properties.out_file() {
        Some(path) => println!(
            "  {:<18}{}",
            s.label.apply_to("Out file"),
            s.path.apply_to(path.display())
        ),
        None => println!(
            "  {:<18}{}",
            s.label.apply_to("Out file"),
            s.disabled.apply_to("none")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Tilt"));
    let alpha_arr = properties.alpha_arr();
    println!(
        "    {:<16}{}",
        s.label.apply_to("Range"),
        s.value.apply_to(format!(
            "{} .. {} deg",
            alpha_arr[0],
            alpha_arr[alpha_arr.len() - 1]
        ))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Step"),
        s.value.apply_to(format!("{} deg", properties.alpha_step()))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Images"),
        s.value.apply_to(properties.image_count())
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Duration"),
        s.value
            .apply_to(format!("{:.1} s", properties.total_tilt_duration()))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Tilt speed"),
        s.method.apply_to(format!("{:.6}", properties.tilt_speed()))
    );
    println!("    {:<16}{:?}", s.label.apply_to("Midpoints"), properties.alphas());
    println!();
}
