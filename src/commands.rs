// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use anyhow::{bail, Context, Result};
use app_config::Settings;
use colored::*;
use glam::f64::DVec3;
use periodic_table::{AtomType, AtomTypeTable};
use simulation_import::{
    save_timestep, save_xyz, Decomposition, Direction, Frame, Mts0Source, Playback,
    PlaybackMode, TimestepSource, Timer, Trajectory,
};
use std::path::Path;
use timestep::visibility::{visible_atoms, VisibilityQuery};
use timestep::{AtomTypeMasses, CellListParams, Timestep};

fn mts0_source(settings: &Settings) -> Result<Mts0Source> {
    let d = settings.decomposition;
    let decomposition = Decomposition::new(d.nx, d.ny, d.nz)?;
    Ok(Mts0Source::new(&settings.foldername_base, decomposition)
        .with_step(settings.step)
        .with_water_removal(settings.remove_water)
        .with_velocities(settings.velocities))
}

fn load(settings: &Settings, index: usize) -> Result<Timestep> {
    if index > settings.max_timestep {
        bail!(
            "timestep {} is past max_timestep {}",
            index,
            settings.max_timestep
        );
    }
    let mut source = mts0_source(settings)?;
    let directory = source.directory(index);
    source
        .load(index)
        .with_context(|| format!("loading timestep {} from {}", index, directory.display()))
}

fn masses(settings: &Settings) -> AtomTypeMasses {
    let mut masses = AtomTypeMasses::standard();
    for (&atom_type, &mass) in &settings.masses {
        masses.set(atom_type, mass);
    }
    masses
}

fn paint(atom_type: AtomType, table: &AtomTypeTable) -> ColoredString {
    let color = table.get(atom_type).color * 255.0;
    format!("{:>2}", atom_type.symbol()).truecolor(
        color.x.round() as u8,
        color.y.round() as u8,
        color.z.round() as u8,
    )
}

pub fn info(settings: &Settings, index: usize) -> Result<()> {
    let timestep = load(settings, index)?;
    let lengths = timestep.lengths();
    let table = AtomTypeTable::default();

    println!("{}", format!("Timestep {}", index).green());
    println!(
        "- box: {:.4} x {:.4} x {:.4} Å ({:.1} Å³)",
        lengths.x,
        lengths.y,
        lengths.z,
        timestep.volume()
    );
    println!("- atoms: {}", timestep.len());

    let counts = timestep.count_by_type();
    for (atom_type, count) in counts.iter() {
        println!(
            "  {} {:>10}  radius {:.2} Å",
            paint(atom_type, &table),
            count,
            table.get(atom_type).radius
        );
    }

    if timestep.velocities().is_some() {
        let indices: Vec<usize> = timestep.iter().map(|(index, _)| index).collect();
        match timestep.momentum_of_atoms(&indices, &masses(settings)) {
            Ok(momentum) => println!(
                "- total momentum: {:.6e} {:.6e} {:.6e}",
                momentum.x, momentum.y, momentum.z
            ),
            Err(err) => println!("{}", format!("- total momentum unavailable: {}", err).yellow()),
        }
    }
    Ok(())
}

fn report_frame(index: usize, timestep: &Timestep, query: &VisibilityQuery) {
    let visible = visible_atoms(timestep, query);
    let nearest = visible
        .first()
        .map(|atom| format!("{:.2} Å", atom.distance_sq.sqrt()))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "timestep {:>6}: {:>9} atoms, {:>9} visible, nearest {}",
        index,
        timestep.len(),
        visible.len(),
        nearest
    );
}

pub fn play(
    settings: &Settings,
    frames: Option<usize>,
    backward: bool,
    camera: Option<&[f64]>,
    skip_errors: bool,
) -> Result<()> {
    let mode = if settings.preload {
        PlaybackMode::Preload
    } else {
        PlaybackMode::Streaming
    };
    let trajectory = Trajectory::new(mts0_source(settings)?, settings.max_timestep, mode)?;
    let direction = if backward {
        Direction::Backward
    } else {
        Direction::Forward
    };

    let visibility = &settings.visibility;
    let camera = match camera {
        Some(&[x, y, z]) => DVec3::new(x, y, z),
        _ => trajectory.current().lengths() * 0.5,
    };
    let query = VisibilityQuery {
        camera,
        view_direction: DVec3::NEG_Z,
        min_distance: visibility.min_distance,
        max_distance: visibility.max_distance,
        shade_cutoff_sq: visibility.color_cutoff,
        periodic_images: visibility.periodic_images,
        hide_water: visibility.hide_water,
        max_atoms: visibility.max_atoms,
    };

    println!(
        "{}",
        format!("Playing {} timesteps ({:?})", trajectory.len(), mode).green()
    );
    report_frame(trajectory.current_index(), trajectory.current(), &query);

    // Every visited index is one frame, whether it is shown or skipped.
    let len = trajectory.len();
    let mut playback = Playback::new(trajectory, direction);
    for _ in 0..frames.unwrap_or(len) {
        match playback.next_frame() {
            Frame::Shown { index, timestep } => report_frame(index, timestep, &query),
            Frame::Skipped { index, error } if skip_errors => {
                println!("{}", format!("timestep {:>6}: skipped ({})", index, error).red());
            }
            Frame::Skipped { index, error } => {
                return Err(error).with_context(|| format!("playing timestep {}", index));
            }
        }
    }
    Ok(())
}

pub fn neighbors(settings: &Settings, index: usize, radius: Option<f64>) -> Result<()> {
    let timestep = load(settings, index)?;
    let radius = radius.unwrap_or(settings.neighbor.radius);
    let params =
        CellListParams::new(radius).with_boundary_epsilon(settings.neighbor.boundary_epsilon);

    let mut neighbor_list = {
        let _timer = Timer::new(format!("cell list (r = {})", radius));
        timestep.neighbors_with(params)?
    };
    let candidates = neighbor_list.pair_count();
    neighbor_list.retain_within(timestep.positions(), timestep.simulation_box(), radius);
    let pairs = neighbor_list.pair_count();

    println!("{}", format!("Timestep {}, r = {} Å", index, radius).green());
    println!("- candidate pairs: {}", candidates);
    println!("- pairs within r:  {}", pairs);
    if !timestep.is_empty() {
        println!(
            "- mean neighbors:  {:.3}",
            2.0 * pairs as f64 / timestep.len() as f64
        );
    }

    let table = AtomTypeTable::default();
    let present: Vec<AtomType> = timestep
        .count_by_type()
        .iter()
        .map(|(atom_type, _)| atom_type)
        .collect();
    for (n, &first) in present.iter().enumerate() {
        for &second in &present[n..] {
            let distance = timestep.min_distance_between_types(first, second, radius)?;
            let distance = distance
                .map(|d| format!("{:.4} Å", d))
                .unwrap_or_else(|| format!("> {} Å", radius));
            println!(
                "  {}-{} closest {}",
                paint(first, &table),
                paint(second, &table),
                distance
            );
        }
    }
    Ok(())
}

pub fn export_xyz(settings: &Settings, index: usize, output: &Path) -> Result<()> {
    let timestep = load(settings, index)?;
    save_xyz(&timestep, output)?;
    println!(
        "{}",
        format!("Wrote {} atoms to {}", timestep.remaining_count(), output.display()).green()
    );
    Ok(())
}

pub fn repartition(settings: &Settings, index: usize, counts: [usize; 3], output: &Path) -> Result<()> {
    let mut timestep = load(settings, index)?;
    let decomposition = Decomposition::new(counts[0], counts[1], counts[2])?;
    save_timestep(&mut timestep, &decomposition, output)?;
    println!(
        "{}",
        format!(
            "Re-sharded {} atoms into {} node files in {}",
            timestep.len(),
            decomposition.node_count(),
            output.display()
        )
        .green()
    );
    Ok(())
}

// End of File
