use super::*;
use crate::reducer::ProjectedPoint;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn cluster(id: u32, members: &[SeedId]) -> Cluster {
    Cluster {
        id,
        members: members.to_vec(),
        center: ProjectedPoint::default(),
    }
}

#[test]
fn test_one_per_cluster() {
    let clusters = vec![cluster(0, &[0, 1, 2]), cluster(1, &[3, 4, 5]), cluster(2, &[6])];
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let selection = SeedSelector::default().select(&clusters, &mut rng);

    assert_eq!(selection.len(), 3);
    for c in &clusters {
        let hits = c.members.iter().filter(|m| selection.contains(**m)).count();
        assert_eq!(hits, 1);
    }
    assert!(selection.contains(6));
    assert_eq!(selection.cluster_of(6), Some(2));
}

#[test]
fn test_per_cluster_is_capped_by_cluster_size() {
    let clusters = vec![cluster(0, &[0]), cluster(1, &[1, 2, 3, 4])];
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let selection = SeedSelector::new(3).select(&clusters, &mut rng);

    assert_eq!(selection.picks()[0].seeds, vec![0]);
    assert_eq!(selection.picks()[1].seeds.len(), 3);
    assert_eq!(selection.len(), 4);
}

#[test]
fn test_selection_is_reproducible() {
    let clusters: Vec<Cluster> = (0..20)
        .map(|c| cluster(c, &((c * 10)..(c * 10 + 10)).collect::<Vec<_>>()))
        .collect();
    let selector = SeedSelector::new(2);

    let a: Vec<SeedId> = selector
        .select(&clusters, &mut ChaCha8Rng::seed_from_u64(5))
        .iter()
        .collect();
    let b: Vec<SeedId> = selector
        .select(&clusters, &mut ChaCha8Rng::seed_from_u64(5))
        .iter()
        .collect();
    assert_eq!(a, b);
    assert_eq!(a.len(), 40);
}

#[test]
fn test_input_order_does_not_matter() {
    let forward = vec![cluster(0, &[0, 1, 2]), cluster(1, &[2, 3, 4]), cluster(2, &[5, 6])];
    let mut reversed = forward.clone();
    reversed.reverse();

    let selector = SeedSelector::default();
    let a = selector.select(&forward, &mut ChaCha8Rng::seed_from_u64(8));
    let b = selector.select(&reversed, &mut ChaCha8Rng::seed_from_u64(8));

    assert_eq!(a.picks(), b.picks());
    let order: Vec<u32> = a.picks().iter().map(|p| p.cluster).collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn test_overlap_is_preferred() {
    let clusters = vec![cluster(0, &[2]), cluster(1, &[2, 3, 4])];
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let selection = SeedSelector::default().select(&clusters, &mut rng);

    assert_eq!(selection.len(), 1);
    assert!(selection.contains(2));
    assert_eq!(selection.picks()[1].reused, 1);
}

#[test]
fn test_overlap_tops_up_from_fresh_members() {
    let clusters = vec![cluster(0, &[2]), cluster(1, &[2, 3, 4])];
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let selection = SeedSelector::new(2).select(&clusters, &mut rng);

    let second = &selection.picks()[1];
    assert_eq!(second.seeds.len(), 2);
    assert_eq!(second.reused, 1);
    assert!(second.seeds.contains(&2));
    assert_eq!(selection.len(), 2);
}

#[test]
fn test_without_overlap_preference_nothing_is_reused() {
    let clusters = vec![cluster(0, &[2]), cluster(1, &[2])];
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let selection = SeedSelector::default()
        .prefer_overlap(false)
        .select(&clusters, &mut rng);

    assert_eq!(selection.picks()[1].reused, 0);
    assert_eq!(selection.picks()[1].seeds, vec![2]);
    assert_eq!(selection.len(), 1);
}

#[test]
fn test_no_clusters() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let selection = SeedSelector::default().select(&[], &mut rng);
    assert!(selection.is_empty());
    assert!(selection.picks().is_empty());
}
