use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nalgebra::{Vector2, Vector3};
use sicd_projection::{
    compute_projection_sets, geodetic_to_ecef, scene_to_image, CollectGeometry, GridType,
    ImageFormationAlgorithm, MetadataParams, PfaParams, Polynomial, Polynomial2d,
    SceneToImageParams, SideOfTrack, XyzPolynomial,
};

/// Broadside monostatic collection over the equator, matching the shape of
/// typical spaceborne stripmap metadata.
fn broadside_meta() -> MetadataParams {
    let scp = geodetic_to_ecef(0.0, 0.0, 0.0);
    let arp = scp + Vector3::new(500_000.0, -100_000.0, 0.0);
    let varp = Vector3::new(0.0, 0.0, 7_500.0);

    let range_vec = scp - arp;
    let r_scp = range_vec.norm();

    MetadataParams {
        scp,
        scp_lat: 0.0,
        scp_lon: 0.0,
        scp_hae: 0.0,
        u_row: range_vec / r_scp,
        u_col: Vector3::new(0.0, 0.0, 1.0),
        side_of_track: SideOfTrack::Right,
        grid_type: GridType::RgAzim,
        ifa: ImageFormationAlgorithm::Pfa,
        ct_coa: Polynomial2d::new(vec![vec![0.0, 1.0 / varp.z]]),
        pfa: Some(PfaParams {
            polar_ang_poly: Polynomial::new(vec![0.0, -varp.z / r_scp]),
            spatial_freq_sf_poly: Polynomial::constant(1.0),
        }),
        geometry: CollectGeometry::Monostatic {
            arp_poly: XyzPolynomial::new(vec![arp, varp]),
            arp_scp_coa: arp,
            varp_scp_coa: varp,
        },
    }
}

fn bench_projection_sets(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_sets");
    let meta = broadside_meta();

    for size in [16usize, 256, 4096] {
        let locs: Vec<Vector2<f64>> = (0..size)
            .map(|i| Vector2::new((i % 64) as f64 * 10.0 - 320.0, (i / 64) as f64 * 10.0))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &locs, |b, locs| {
            b.iter(|| compute_projection_sets(black_box(&meta), black_box(locs)))
        });
    }
    group.finish();
}

fn bench_scene_to_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_to_image");
    let meta = broadside_meta();
    let params = SceneToImageParams::default();

    for size in [16usize, 256] {
        let scene_points: Vec<Vector3<f64>> = (0..size)
            .map(|i| meta.scp + Vector3::new(0.0, (i % 16) as f64 * 25.0, (i / 16) as f64 * 25.0))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &scene_points, |b, pts| {
            b.iter(|| scene_to_image(black_box(&meta), black_box(pts), &params))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projection_sets, bench_scene_to_image);
criterion_main!(benches);
