use super::*;
use crate::cfg::PathCfg;
use crate::fixtures;
use crate::lattice::{Image, Lattice, Site};
use crate::symmetry::{FixedOps, SymmOp};
use nalgebra::vector;
use proptest::prelude::*;

fn chain_mapper(ops: Vec<SymmOp>) -> FullPathMapper {
    let cfg = MapperCfg {
        max_path_length: 4.0,
        ..MapperCfg::default()
    };
    FullPathMapper::new(fixtures::chain(), "Li", cfg, &FixedOps(ops)).unwrap()
}

fn uneven_mapper() -> FullPathMapper {
    let cfg = MapperCfg {
        max_path_length: 4.0,
        ..MapperCfg::default()
    };
    FullPathMapper::new(fixtures::uneven_chain(), "Li", cfg, &FixedOps::default()).unwrap()
}

fn step(edge: usize, i: usize, e: usize, img: [i32; 3]) -> HopStep {
    HopStep {
        edge: EdgeId(edge),
        iindex: i,
        eindex: e,
        to_jimage: Image(img),
        hop_label: HopLabel(0),
    }
}

#[test]
fn vacancy_mode_is_rejected() {
    let cfg = MapperCfg {
        vac_mode: true,
        ..MapperCfg::default()
    };
    let err = FullPathMapper::new(fixtures::chain(), "Li", cfg, &FixedOps::default()).unwrap_err();
    assert!(matches!(err, MapperError::VacancyModeUnsupported));
}

#[test]
fn only_migrating_sites_become_nodes() {
    let m = chain_mapper(vec![]);
    assert_eq!(m.only_sites().len(), 2);
    assert!(m.only_sites().sites.iter().all(|s| s.species == "Li"));
    assert_eq!(m.graph().num_nodes(), 2);
    assert_eq!(m.graph().num_edges(), 2);
}

#[test]
fn labels_follow_symmetry() {
    // P1: the two chain hops point opposite ways and stay distinct.
    let p1 = chain_mapper(vec![]);
    assert_eq!(p1.num_unique_hops(), 2);
    // A mirror through x = 0 maps one onto the other.
    let mirrored = chain_mapper(fixtures::mirror_x().ops);
    assert_eq!(mirrored.num_unique_hops(), 1);
    assert!(mirrored
        .graph()
        .edges()
        .iter()
        .all(|e| e.hop_label == HopLabel(0)));
}

#[test]
fn representative_is_first_edge_of_label() {
    let m = chain_mapper(fixtures::mirror_x().ops);
    let (label, rep) = m.unique_hops().next().unwrap();
    assert_eq!(label, HopLabel(0));
    assert_eq!(rep, &m.graph().edges()[0]);
    assert_eq!(rep.to_jimage, Image::new(-1, 0, 0));
}

#[test]
fn every_label_has_a_representative_and_back() {
    let m = uneven_mapper();
    let labels = m.graph().labels();
    assert_eq!(labels.len(), m.num_unique_hops());
    for (label, rep) in m.unique_hops() {
        assert!(labels.contains(&label));
        assert_eq!(rep.hop_label, label);
    }
}

#[test]
fn broadcast_reaches_every_edge_of_label() {
    let mut m = chain_mapper(fixtures::mirror_x().ops);
    let data = AttrMap::from([("barrier".to_string(), Attr::Number(0.4))]);
    let n = m.add_data_to_similar_edges(HopLabel(0), &data, None).unwrap();
    assert_eq!(n, 2);
    assert!(m.graph().edges().iter().all(|e| e.number("barrier") == Some(0.4)));
}

#[test]
fn broadcast_unknown_label_fails() {
    let mut m = chain_mapper(vec![]);
    let err = m
        .add_data_to_similar_edges(HopLabel(7), &AttrMap::new(), None)
        .unwrap_err();
    assert!(matches!(err, MapperError::UnknownLabel(HopLabel(7))));
}

#[test]
fn broadcast_flips_lists_on_opposite_edges() {
    // Without symmetry between sites 0 and 1, a reference hop starting at site
    // 1 runs against every edge stored from site 0.
    let mut m = chain_mapper(fixtures::mirror_x().ops);
    let reference = m.graph().edges()[0].hop.reversed();
    let data = AttrMap::from([
        ("profile".to_string(), Attr::profile([1.0, 2.0, 3.0])),
        ("kind".to_string(), Attr::from("vacancy")),
    ]);
    m.add_data_to_similar_edges(HopLabel(0), &data, Some(&reference))
        .unwrap();
    for e in m.graph().edges() {
        assert_eq!(e.data["profile"], Attr::profile([3.0, 2.0, 1.0]));
        assert_eq!(e.data["kind"], Attr::from("vacancy"));
    }
}

#[test]
fn broadcast_keeps_lists_on_aligned_edges() {
    let mut m = chain_mapper(fixtures::mirror_x().ops);
    let reference = m.graph().edges()[0].hop.clone();
    let data = AttrMap::from([("profile".to_string(), Attr::profile([1.0, 2.0]))]);
    m.add_data_to_similar_edges(HopLabel(0), &data, Some(&reference))
        .unwrap();
    for e in m.graph().edges() {
        assert_eq!(e.data["profile"], Attr::profile([1.0, 2.0]));
    }
}

#[test]
fn broadcast_rejects_flipping_arrays_without_side_effects() {
    let mut m = chain_mapper(fixtures::mirror_x().ops);
    let reference = m.graph().edges()[0].hop.reversed();
    let data = AttrMap::from([
        ("profile".to_string(), Attr::profile([1.0, 2.0])),
        ("pos".to_string(), Attr::from(vector![1.0, 0.0, 0.0])),
    ]);
    let err = m
        .add_data_to_similar_edges(HopLabel(0), &data, Some(&reference))
        .unwrap_err();
    assert!(matches!(err, MapperError::AmbiguousFlip { ref key } if key == "pos"));
    assert!(m.graph().edges().iter().all(|e| e.data.is_empty()));
}

#[test]
fn broadcast_leaves_other_attributes_alone() {
    // P1: the two chain hops carry labels 0 and 1
    let mut m = chain_mapper(vec![]);
    assert_eq!(m.num_unique_hops(), 2);
    let seed = AttrMap::from([
        ("seed".to_string(), Attr::profile([1.0, 2.0, 3.0])),
        ("note".to_string(), Attr::from("kept")),
    ]);
    for label in [HopLabel(0), HopLabel(1)] {
        m.add_data_to_similar_edges(label, &seed, None).unwrap();
    }
    let before = m.graph().edges().to_vec();

    let reference = m.unique_hop(HopLabel(0)).unwrap().hop.reversed();
    let data = AttrMap::from([("barrier".to_string(), Attr::profile([0.1, 0.5]))]);
    m.add_data_to_similar_edges(HopLabel(0), &data, None).unwrap();
    m.add_data_to_similar_edges(HopLabel(0), &data, Some(&reference))
        .unwrap();

    for (old, new) in before.iter().zip(m.graph().edges()) {
        if old.hop_label == HopLabel(1) {
            assert_eq!(new, old);
            continue;
        }
        assert_eq!(new.data["barrier"], Attr::profile([0.5, 0.1]));
        assert_eq!(new.data["seed"], Attr::profile([1.0, 2.0, 3.0]));
        assert_eq!(new.data["note"], Attr::from("kept"));
        assert_eq!(new.data.len(), 3);
        assert_eq!(new.cost, old.cost);
        assert_eq!(new.hop_label, old.hop_label);
        assert_eq!((new.iindex, new.eindex, new.to_jimage), (old.iindex, old.eindex, old.to_jimage));
        assert_eq!((new.ipos, new.epos), (old.ipos, old.epos));
    }
}

#[test]
fn broadcast_cost_sets_weight() {
    let mut m = chain_mapper(vec![]);
    let data = AttrMap::from([("cost".to_string(), Attr::Number(9.0))]);
    m.add_data_to_similar_edges(HopLabel(1), &data, None).unwrap();
    let e = m.unique_hop(HopLabel(1)).unwrap();
    assert_eq!(e.cost, 9.0);
    assert!(!e.data.contains_key("cost"));
}

#[test]
fn cost_is_product_of_keys() {
    let mut m = uneven_mapper();
    for (label, energy) in [(HopLabel(0), 0.5), (HopLabel(1), 2.0)] {
        let data = AttrMap::from([("energy".to_string(), Attr::Number(energy))]);
        m.add_data_to_similar_edges(label, &data, None).unwrap();
    }
    m.assign_cost_to_graph(&["hop_distance", "energy"]).unwrap();
    for e in m.graph().edges() {
        let expected = e.hop_distance * e.number("energy").unwrap();
        assert!((e.cost - expected).abs() < 1e-12);
    }
}

#[test]
fn cost_defaults_to_hop_distance() {
    let mut m = uneven_mapper();
    m.assign_cost_to_graph(&["hop_distance"]).unwrap();
    let mut distances: Vec<f64> = m.graph().edges().iter().map(|e| e.cost).collect();
    distances.sort_by(f64::total_cmp);
    assert!((distances[0] - 2.0).abs() < 1e-9);
    assert!((distances[1] - 3.0).abs() < 1e-9);
}

#[test]
fn empty_cost_keys_give_unit_cost() {
    let mut m = uneven_mapper();
    m.assign_cost_to_graph(&[]).unwrap();
    assert!(m.graph().edges().iter().all(|e| e.cost == 1.0));
}

#[test]
fn missing_cost_key_fails() {
    let mut m = uneven_mapper();
    let err = m.assign_cost_to_graph(&["barrier"]).unwrap_err();
    assert!(matches!(err, MapperError::MissingAttribute { ref key, .. } if key == "barrier"));
}

#[test]
fn non_numeric_cost_key_fails() {
    let mut m = uneven_mapper();
    for label in [HopLabel(0), HopLabel(1)] {
        let data = AttrMap::from([("kind".to_string(), Attr::from("x"))]);
        m.add_data_to_similar_edges(label, &data, None).unwrap();
    }
    let err = m.assign_cost_to_graph(&["kind"]).unwrap_err();
    assert!(matches!(err, MapperError::NonNumericAttribute { .. }));
}

#[test]
fn chain_yields_a_path_per_node() {
    let m = chain_mapper(vec![]);
    let paths: Vec<_> = m
        .get_intercollating_path(100.0)
        .collect::<Result<Vec<_>>>()
        .unwrap();
    assert_eq!(paths.len(), 2);
    for (u, path) in &paths {
        assert_eq!(path.len(), 2);
        // Summed image displacement walking from u returns to u one cell over.
        let mut at = *u;
        let mut net = Image::ZERO;
        for h in path {
            if h.iindex == at {
                net += h.to_jimage;
                at = h.eindex;
            } else {
                assert_eq!(h.eindex, at);
                net = net - h.to_jimage;
                at = h.iindex;
            }
        }
        assert_eq!(at, *u);
        assert_eq!(net.max_abs(), 1);
    }
}

#[test]
fn path_steps_are_edges_of_the_graph() {
    let m = chain_mapper(vec![]);
    for item in m.get_intercollating_path(100.0) {
        let (_, path) = item.unwrap();
        for h in path {
            let e = m.graph().edge(h.edge);
            assert_eq!((e.iindex, e.eindex, e.to_jimage), (h.iindex, h.eindex, h.to_jimage));
        }
    }
}

#[test]
fn pruning_below_every_cost_yields_nothing() {
    let m = chain_mapper(vec![]);
    assert_eq!(m.get_intercollating_path(1.0).count(), 0);
}

#[test]
fn pruning_cuts_the_cheap_route() {
    // 2 Å and 3 Å hops: with the 3 Å hop pruned the chain no longer percolates.
    let m = uneven_mapper();
    assert_eq!(m.get_intercollating_path(2.5).count(), 0);
    assert_eq!(m.get_intercollating_path(3.5).count(), 2);
}

#[test]
fn extraction_restarts_on_each_call() {
    let m = chain_mapper(vec![]);
    let first: Vec<_> = m.get_intercollating_path(100.0).map(|r| r.unwrap()).collect();
    let second: Vec<_> = m.get_intercollating_path(100.0).map(|r| r.unwrap()).collect();
    assert_eq!(first, second);
}

#[test]
fn square_net_percolates_along_a_axis_tie() {
    let cfg = MapperCfg {
        max_path_length: 3.5,
        ..MapperCfg::default()
    };
    let m = FullPathMapper::new(fixtures::square_net(), "Li", cfg, &FixedOps::default()).unwrap();
    let paths: Vec<_> = m
        .intercollating_paths(PathCfg::default())
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(paths.len(), 1);
    let (u, path) = &paths[0];
    assert_eq!(*u, 0);
    assert_eq!(path.len(), 1);
    // Four images tie at 3 Å; the smallest, (-1, 0, 0), is reached by walking
    // the stored a-axis loop backward.
    assert_eq!(path[0].to_jimage, Image::new(1, 0, 0));
}

#[test]
fn modify_path_puts_crossing_hop_last() {
    // 0 -> 1 inside the cell, then 1 -> 0 via the stored (0, 1, -1) edge.
    let raw = vec![step(1, 0, 1, [0, 0, 0]), step(0, 0, 1, [-1, 0, 0])];
    let out = modify_path(&raw).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[1], step(0, 0, 1, [-1, 0, 0]));
    assert_eq!(out[0], step(1, 1, 0, [0, 0, 0]));
    assert_eq!(get_hop_site_sequence(&out, out[0].iindex).unwrap(), vec![1, 0, 1]);
}

#[test]
fn modify_path_keeps_canonical_input() {
    let canonical = vec![step(1, 1, 0, [0, 0, 0]), step(0, 0, 1, [-1, 0, 0])];
    assert_eq!(modify_path(&canonical).unwrap(), canonical);
}

#[test]
fn modify_path_single_self_loop() {
    let raw = vec![step(0, 0, 0, [1, 0, 0])];
    assert_eq!(modify_path(&raw).unwrap(), raw);
}

#[test]
fn modify_path_rejects_zero_or_many_crossings() {
    let none = vec![step(0, 0, 1, [0, 0, 0]), step(0, 0, 1, [0, 0, 0])];
    assert!(modify_path(&none).is_none());
    let two = vec![step(0, 0, 1, [1, 0, 0]), step(1, 0, 1, [-1, 0, 0])];
    assert!(modify_path(&two).is_none());
    assert!(modify_path(&[]).is_none());
}

#[test]
fn modify_paths_skips_failures() {
    let good = vec![step(1, 0, 1, [0, 0, 0]), step(0, 0, 1, [-1, 0, 0])];
    let bad = vec![step(0, 0, 1, [0, 0, 0]), step(0, 0, 1, [0, 0, 0])];
    let out: Vec<_> = modify_paths(vec![bad, good]).collect();
    assert_eq!(out.len(), 1);
}

#[test]
fn extracted_paths_canonicalize() {
    let m = chain_mapper(vec![]);
    for item in m.get_intercollating_path(100.0) {
        let (_, path) = item.unwrap();
        let out = modify_path(&path).unwrap();
        let last = out.last().unwrap();
        assert!(last.crosses_cell());
        assert_eq!(m.graph().edge(last.edge).to_jimage, last.to_jimage);
        assert!(out[..out.len() - 1].iter().all(|h| !h.crosses_cell()));
    }
}

#[test]
fn hop_site_sequence_follows_chain() {
    let hops = vec![step(0, 0, 1, [0, 0, 0]), step(1, 1, 2, [0, 0, 0]), step(2, 2, 0, [1, 0, 0])];
    assert_eq!(get_hop_site_sequence(&hops, 0).unwrap(), vec![0, 1, 2, 0]);
}

#[test]
fn hop_site_sequence_rejects_gaps() {
    let hops = vec![step(0, 0, 1, [0, 0, 0]), step(1, 2, 0, [0, 0, 0])];
    let err = get_hop_site_sequence(&hops, 0).unwrap_err();
    assert!(matches!(err, MapperError::BrokenHopSequence { position: 1, previous: 1, .. }));
    assert!(matches!(get_hop_site_sequence(&[], 0), Err(MapperError::EmptyHopList)));
}

#[test]
fn summary_lists_hops_and_unique_hops() {
    let mut m = chain_mapper(fixtures::mirror_x().ops).with_name("chain");
    let data = AttrMap::from([
        ("max_avg_chg".to_string(), Attr::Number(0.1)),
        ("barrier".to_string(), Attr::Number(0.3)),
    ]);
    m.add_data_to_similar_edges(HopLabel(0), &data, None).unwrap();
    let s = m.get_summary_dict();
    assert_eq!(s.name.as_deref(), Some("chain"));
    assert_eq!(s.hops.len(), 2);
    assert_eq!(s.unique_hops.len(), 1);
    assert_eq!(s.unique_hops[0].max_avg_chg, Some(0.1));
    assert!(s.unique_hops[0].chg_total.is_none());
    assert_eq!(s.unique_hops[0].extra.get("barrier"), Some(&Attr::Number(0.3)));
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["unique_hops"][0]["barrier"], 0.3);
    assert_eq!(json["hops"][0]["to_jimage"], serde_json::json!([-1, 0, 0]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Random Li arrangements: labels are total, representatives cover every
    // label, and every extracted path is a closed walk that canonicalizes.
    #[test]
    fn random_structures_satisfy_map_invariants(
        fracs in prop::collection::vec(prop::array::uniform3(0.0f64..1.0), 1..4)
    ) {
        let lattice = Lattice::orthorhombic(3.5, 4.0, 4.5);
        let sites: Vec<Site> = fracs.iter().map(|f| Site::new("Li", nalgebra::Vector3::from(*f))).collect();
        let cfg = MapperCfg { max_path_length: 4.6, ..MapperCfg::default() };
        let m = FullPathMapper::new(Structure::new(lattice, sites), "Li", cfg, &FixedOps::default()).unwrap();
        prop_assert_eq!(m.graph().labels().len(), m.num_unique_hops());
        for e in m.graph().edges() {
            prop_assert!(e.iindex <= e.eindex);
            prop_assert!(m.unique_hop(e.hop_label).is_some());
        }
        for item in m.get_intercollating_path(100.0) {
            let (u, path) = item.unwrap();
            prop_assert!(!path.is_empty());
            let mut at = u;
            for h in &path {
                let e = m.graph().edge(h.edge);
                prop_assert_eq!((e.iindex, e.eindex), (h.iindex, h.eindex));
                if h.iindex == at {
                    at = h.eindex;
                } else {
                    prop_assert_eq!(h.eindex, at);
                    at = h.iindex;
                }
            }
            prop_assert_eq!(at, u);
        }
    }
}
