use log::{error, info};
use rand::SeedableRng;

use sheen::{
    cli::parse_args,
    denoise::Denoiser,
    display,
    logger::init_logger,
    render::Renderer,
    scenes,
};

fn main() {
    // Parsing cli args
    let cli_args = parse_args();
    init_logger(cli_args.verbosity.log_level_filter());

    if let Err(why) = run(&cli_args) {
        error!("{why}");
        std::process::exit(1);
    }
}

fn run(cli_args: &sheen::cli::Arguments) -> sheen::Result<()> {
    // fail on bad filter parameters before spending time on rendering
    let denoiser = Denoiser::new(cli_args.denoise_config())?;

    // set up enviroment
    let seed = if let Some(seed) = cli_args.seed {
        // use user-provided seed if available
        seed
    } else if cfg!(debug_assertions) {
        // if debugging, use deterministic seed
        0
    } else {
        // otherwise real psuedo-randomness
        rand::random()
    };
    let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
    info!("using seed {seed}");

    // Get scene
    let (cam, scene, (width, height)) =
        scenes::get_scene(cli_args.image_width, cli_args.scene, &mut rng);
    info!(
        "scene {:?} with {} objects and {} triangles",
        cli_args.scene,
        scene.geoms().len(),
        scene.triangles().len()
    );

    let renderer = Renderer::new(
        width,
        height,
        cli_args.samples_per_pixel,
        cli_args.ao_radius,
        seed,
    );
    let mut frame = renderer.new_frame();
    renderer.render_frame(&scene, &cam, &mut frame)?;
    let noisy = frame.average();

    let denoised = if cli_args.display.needs_denoising() {
        let size = denoiser.kernel().size();
        info!(
            "denoising with {} passes of a {size}x{size} kernel, {:?}",
            denoiser.passes(),
            denoiser.config()
        );
        Some(denoiser.denoise(&noisy, &frame.gbuffer)?)
    } else {
        None
    };

    let img_buf = display::to_image(
        cli_args.display,
        &frame.gbuffer,
        &noisy,
        denoised.as_deref(),
    );

    // write image to file
    img_buf.save(&cli_args.output)?;
    info!("Image written to {:?}", &cli_args.output);

    Ok(())
}
