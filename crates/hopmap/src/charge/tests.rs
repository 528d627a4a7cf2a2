use super::*;
use crate::cfg::{ChargeCfg, MapperCfg};
use crate::error::MapperError;
use crate::fixtures;
use crate::graph::{Attr, AttrMap, HopLabel};
use crate::hop::MigrationHop;
use crate::lattice::{Lattice, Site, Structure};
use crate::mapper::FullPathMapper;
use crate::symmetry::FixedOps;
use nalgebra::vector;

fn cube4() -> Structure {
    Structure::new(Lattice::cubic(4.0), vec![])
}

fn chain_mapper() -> FullPathMapper {
    let cfg = MapperCfg {
        max_path_length: 4.0,
        ..MapperCfg::default()
    };
    FullPathMapper::new(fixtures::chain(), "Li", cfg, &FixedOps::default()).unwrap()
}

/// Two parallel Li rows along a, 5 Å apart: each node escapes through its own loop.
fn two_rows_mapper() -> FullPathMapper {
    let s = Structure::new(
        Lattice::orthorhombic(3.0, 10.0, 10.0),
        vec![
            Site::new("Li", vector![0.0, 0.0, 0.0]),
            Site::new("Li", vector![0.0, 0.5, 0.0]),
        ],
    );
    let cfg = MapperCfg {
        max_path_length: 3.5,
        ..MapperCfg::default()
    };
    FullPathMapper::new(s, "Li", cfg, &FixedOps::default()).unwrap()
}

#[test]
fn grid_points_are_cell_centred_first_axis_slowest() {
    let f = grid_frac_coords([2, 2, 1]);
    assert_eq!(f.len(), 4);
    assert_eq!(f[0], vector![0.25, 0.25, 0.5]);
    assert_eq!(f[1], vector![0.25, 0.75, 0.5]);
    assert_eq!(f[2], vector![0.75, 0.25, 0.5]);
}

#[test]
fn grid_rejects_wrong_length() {
    let err = VolumetricGrid::new(cube4(), [2, 2, 2], vec![0.0; 7]).unwrap_err();
    assert!(matches!(err, MapperError::GridShapeMismatch { expected: 8, found: 7, .. }));
}

#[test]
fn tube_counts_points_on_segment() {
    let grid = VolumetricGrid::from_fn(cube4(), [4, 4, 4], |_| 1.0);
    let hop = MigrationHop::new(
        Site::new("Li", vector![0.0, 0.125, 0.125]),
        Site::new("Li", vector![0.5, 0.125, 0.125]),
        0,
        0,
        &grid.structure().lattice,
    );
    let chg = ChargeGrid::new(&grid).chg_between_sites_tube(&hop, 0.1).unwrap();
    // grid points at x = 0.5 Å and 1.5 Å lie on the 2 Å segment
    assert!((chg - 2.0 / 64.0 / 64.0).abs() < 1e-15);
}

#[test]
fn tube_of_empty_density_is_zero() {
    let grid = VolumetricGrid::from_fn(cube4(), [4, 4, 4], |_| 0.0);
    let hop = MigrationHop::new(
        Site::new("Li", vector![0.0, 0.0, 0.0]),
        Site::new("Li", vector![0.5, 0.5, 0.0]),
        0,
        0,
        &grid.structure().lattice,
    );
    assert_eq!(ChargeGrid::new(&grid).chg_between_sites_tube(&hop, 1.0).unwrap(), 0.0);
}

#[test]
fn uniform_density_has_flat_profile() {
    let grid = VolumetricGrid::from_fn(cube4(), [8, 8, 8], |_| 3.0);
    let hop = MigrationHop::new(
        Site::new("Li", vector![0.1, 0.2, 0.3]),
        Site::new("Li", vector![0.6, 0.2, 0.3]),
        0,
        0,
        &grid.structure().lattice,
    );
    let p = ChargeGrid::new(&grid).avg_chg_at_max(&hop, 1.0, 4).unwrap();
    assert_eq!(p.positions.len(), 5);
    assert!((p.positions[0] - hop.isite.frac_coords).norm() < 1e-12);
    assert!((p.positions[4] - hop.esite.frac_coords).norm() < 1e-12);
    for a in &p.averages {
        assert!((a - 3.0 / 64.0).abs() < 1e-12);
    }
    assert!((p.max - 3.0 / 64.0).abs() < 1e-12);
}

#[test]
fn sphere_without_grid_points_averages_to_zero() {
    // One grid point at the cell centre; a tiny sphere at the origin misses it.
    let grid = VolumetricGrid::from_fn(cube4(), [1, 1, 1], |_| 5.0);
    let hop = MigrationHop::new(
        Site::new("Li", vector![0.0, 0.0, 0.0]),
        Site::new("Li", vector![0.0, 0.0, 0.0]),
        0,
        0,
        &grid.structure().lattice,
    );
    let p = ChargeGrid::new(&grid).avg_chg_at_max(&hop, 0.5, 1).unwrap();
    assert_eq!(p.averages, vec![0.0, 0.0]);
}

#[test]
fn non_positive_radius_is_rejected() {
    let grid = VolumetricGrid::from_fn(cube4(), [2, 2, 2], |_| 1.0);
    let hop = MigrationHop::new(
        Site::new("Li", vector![0.0, 0.0, 0.0]),
        Site::new("Li", vector![0.5, 0.0, 0.0]),
        0,
        0,
        &grid.structure().lattice,
    );
    let g = ChargeGrid::new(&grid);
    assert!(matches!(
        g.avg_chg_at_max(&hop, 0.0, 2),
        Err(MapperError::NonPositiveRadius { .. })
    ));
    assert!(matches!(
        g.chg_between_sites_tube(&hop, -1.0),
        Err(MapperError::NonPositiveRadius { .. })
    ));
}

#[test]
fn images_attr_pairs_positions_and_charges() {
    let p = ChargeProfile {
        max: 2.0,
        averages: vec![1.0, 2.0],
        positions: vec![vector![0.0, 0.0, 0.0], vector![0.5, 0.0, 0.0]],
    };
    let Attr::List(items) = p.to_images_attr() else {
        panic!("images must be a list");
    };
    assert_eq!(items.len(), 2);
    let Attr::Map(second) = &items[1] else {
        panic!("image entries must be maps");
    };
    assert_eq!(second["average_charge"], Attr::Number(2.0));
    assert_eq!(second["position"], Attr::Array(vec![0.5, 0.0, 0.0]));
}

#[test]
fn populate_decorates_every_edge() {
    let mut m = chain_mapper();
    let grid = VolumetricGrid::from_fn(fixtures::chain(), [6, 10, 10], |_| 1.0);
    let cfg = ChargeCfg {
        tube_radius: 1.0,
        n_images: 4,
    };
    populate_edges_with_chg_density_info(&mut m, Some(&grid), cfg).unwrap();
    for e in m.graph().edges() {
        assert!(e.number("chg_total").unwrap() > 0.0);
        assert!((e.number("max_avg_chg").unwrap() - 1.0 / 600.0).abs() < 1e-12);
    }
    for (_, rep) in m.unique_hops() {
        let Some(Attr::List(images)) = rep.data.get("images") else {
            panic!("representative must carry images");
        };
        assert_eq!(images.len(), 5);
    }
    let s = m.get_summary_dict();
    assert!(s.unique_hops.iter().all(|h| h.images.is_some()));
    assert!(s.hops.iter().all(|h| h.images.is_none() && h.chg_total.is_some()));
}

#[test]
fn populate_without_density_sets_zero_charge() {
    let mut m = chain_mapper();
    populate_edges_with_chg_density_info(&mut m, None, ChargeCfg::default()).unwrap();
    for e in m.graph().edges() {
        assert_eq!(e.number("chg_total"), Some(0.0));
        assert!(e.number("max_avg_chg").is_none());
    }
}

#[test]
fn least_charge_path_prefers_clean_route() {
    let mut m = two_rows_mapper();
    assert_eq!(m.num_unique_hops(), 2);
    for (label, chg) in [(HopLabel(0), 2.0), (HopLabel(1), 1.0)] {
        let data = AttrMap::from([("chg_total".to_string(), Attr::Number(chg))]);
        m.add_data_to_similar_edges(label, &data, None).unwrap();
    }
    let path = get_least_chg_path(&m, 100.0).unwrap().unwrap();
    assert_eq!(path.len(), 1);
    assert_eq!(path[0].iindex, 1);
}

#[test]
fn least_charge_path_needs_charge_data() {
    let m = two_rows_mapper();
    let err = get_least_chg_path(&m, 100.0).unwrap_err();
    assert!(matches!(err, MapperError::MissingAttribute { ref key, .. } if key == "chg_total"));
}

#[test]
fn least_charge_path_none_when_nothing_percolates() {
    let mut m = two_rows_mapper();
    populate_edges_with_chg_density_info(&mut m, None, ChargeCfg::default()).unwrap();
    assert!(get_least_chg_path(&m, 0.5).unwrap().is_none());
}
