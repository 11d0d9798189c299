use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use sheen::{
    denoise::{DenoiseConfig, Denoiser},
    render::Renderer,
    scenes,
};

fn bench_denoise(c: &mut Criterion) {
    // configuration of criterion
    let mut bench_group = c.benchmark_group("denoise");
    // filter noise more noise
    bench_group.noise_threshold(0.05);
    // smaller sig level to combat noise
    bench_group.significance_level(0.1);
    // full-frame filtering is slow, keep the run short
    bench_group.sample_size(20);

    // one noisy frame shared by every configuration
    let mut rng = rand::rngs::SmallRng::seed_from_u64(0);
    let (cam, world, (width, height)) =
        scenes::get_scene(128, scenes::SceneType::Cornell, &mut rng);
    let renderer = Renderer::new(width, height, 2, 1.0, 0);
    let mut frame = renderer.new_frame();
    renderer
        .render_frame(&world, &cam, &mut frame)
        .expect("frame matches renderer");
    let noisy = frame.average();

    for filter_size in [5, 20, 80] {
        let denoiser = Denoiser::new(DenoiseConfig {
            filter_size,
            ..Default::default()
        })
        .expect("valid filter size");

        bench_group.bench_with_input(
            BenchmarkId::from_parameter(filter_size),
            &noisy,
            |b, noisy| b.iter(|| denoiser.denoise(noisy, &frame.gbuffer)),
        );
    }

    bench_group.finish();
}

criterion_group! {benches, bench_denoise}
criterion_main!(benches);
