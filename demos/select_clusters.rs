//! Clustering the items of one parse-change category
//!
//! Builds attribute vectors for a small set of items whose parses changed,
//! selects the number of clusters by silhouette width, and prints the
//! cohesion/overlap table a report would render for each cluster.
//!
//! Run with `RUST_LOG=debug` to see per-k diagnostics.

use gdelta_cluster::{
    build_points, Attribute, ClusteringOptions, Item, ModelSelector, SeedMethod, WeightingMode,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // (name, items carrying it before, after)
    let counts = [
        ("hd-cmp_c", 2, 14),
        ("sb-hd_mc_c", 11, 10),
        ("n_-_pn_le", 9, 1),
        ("aj-hdn_norm_c", 3, 7),
        ("vp_np-nb_c", 12, 4),
        ("mrk-nh_ajlex_c", 0, 5),
    ];
    let (prev_parses, new_parses) = (20, 22);
    let weighting = WeightingMode::DeltaIdf;
    let attributes: Vec<Attribute> = counts
        .iter()
        .map(|&(name, prev, new)| Attribute::new(name, prev, new, prev_parses, new_parses, weighting))
        .collect();

    let items: Vec<Arc<Item>> = vec![
        Item::new(10, vec![vec!["hd-cmp_c", "sb-hd_mc_c"], vec!["hd-cmp_c"]]),
        Item::new(20, vec![vec!["hd-cmp_c", "aj-hdn_norm_c"]]),
        Item::new(30, vec![vec!["hd-cmp_c", "sb-hd_mc_c", "aj-hdn_norm_c"]]),
        Item::new(40, vec![vec!["n_-_pn_le", "vp_np-nb_c"]]),
        Item::new(50, vec![vec!["n_-_pn_le"], vec!["vp_np-nb_c", "sb-hd_mc_c"]]),
        Item::new(60, vec![vec!["vp_np-nb_c"]]),
        Item::new(70, vec![vec!["mrk-nh_ajlex_c", "aj-hdn_norm_c"]]),
        Item::new(80, vec![vec!["mrk-nh_ajlex_c"]]),
        Item::new(90, Vec::<Vec<&str>>::new()),
    ]
    .into_iter()
    .map(Arc::new)
    .collect();

    let points = build_points(&attributes, &items);
    println!("{} of {} items have results to cluster", points.len(), items.len());
    println!();

    // Example 1: best k in 2..=6
    println!("=== Example 1: Selecting k by silhouette ===");
    let options = ClusteringOptions::new(6)
        .weighting(weighting)
        .random_state(42)
        .verbose(true);
    let selector = ModelSelector::new(options);

    let Some(mut result) = selector.select(&points)? else {
        println!("Clustering not possible");
        return Ok(());
    };
    println!("Best k: {}, silhouette: {:.3}", result.k, result.silhouette);

    let described = result.describe(&attributes, 5)?;
    for (i, (cluster, metrics)) in result.clusters.iter().zip(&described).enumerate() {
        let members: Vec<String> = cluster.points().iter().map(ToString::to_string).collect();
        println!(
            "Cluster {}: items [{}], silhouette {:.3}",
            i,
            members.join(", "),
            cluster.silhouette().unwrap_or(0.0)
        );
        for metric in metrics {
            println!(
                "    {:16} cohesion {:3}%  overlap {:3}%",
                metric.attribute,
                metric.cohesion_percent(),
                metric.overlap_percent()
            );
        }
    }
    println!();

    // Example 2: forced k with deterministic seeding
    println!("=== Example 2: Forced k = 3 ===");
    let forced = ModelSelector::new(
        ClusteringOptions::new(3)
            .force_k(true)
            .seeding(SeedMethod::FirstK),
    );
    match forced.select(&points)? {
        Some(result) => println!(
            "k = 3 gave {} clusters, silhouette {:.3}",
            result.clusters.len(),
            result.silhouette
        ),
        None => println!("k = 3 collapsed"),
    }
    println!();

    // Example 3: random partition baseline
    println!("=== Example 3: Random baseline ===");
    if let Some(baseline) = selector.random_baseline(&points, result.k)? {
        println!(
            "Random partition into {} clusters: silhouette {:.3}",
            baseline.clusters.len(),
            baseline.silhouette
        );
    }

    Ok(())
}
