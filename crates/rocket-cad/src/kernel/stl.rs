//! STL export of implicit solids
//!
//! The solid is sampled on a regular grid and every face between an occupied
//! cell and an empty one becomes two triangles, which gives a closed mesh.
//! A cell is occupied when any of its sub-samples is inside. The sub-sample
//! spacing is kept below the thinnest primitive so thin fins survive coarse grids.

use std::path::Path;

use glam::DVec3;

use super::csg::{CsgNode, SampleGrid};
use super::{CadError, CadResult};

/// Upper bound on sub-samples along each cell edge
const MAX_SUBSAMPLES: usize = 8;

/// Write the boundary of `node` as a binary STL file, returning the triangle count
pub(super) fn write_voxel_stl(node: &CsgNode, path: &Path, resolution: u32) -> CadResult<usize> {
    let triangles = match node.bounding_box() {
        Some(bbox) => voxel_surface(node, &SampleGrid::new(&bbox, resolution)),
        None => Vec::new(),
    };

    let mut file = std::fs::File::create(path).map_err(|e| CadError::FileIo(e.to_string()))?;
    stl_io::write_stl(&mut file, triangles.iter()).map_err(|e| CadError::Export(e.to_string()))?;

    Ok(triangles.len())
}

/// Sub-samples per cell edge whose spacing is finer than the thinnest primitive
fn subsamples(node: &CsgNode, grid: &SampleGrid) -> usize {
    let Some(feature) = node.min_feature() else {
        return 1;
    };
    let cell = grid.cell.max_element();
    let needed = if feature > 0.0 {
        (cell / feature).floor() as usize + 1
    } else {
        usize::MAX
    };
    if needed > MAX_SUBSAMPLES {
        tracing::warn!(
            "Features of {} are below the mesh cell size {}; raise the mesh resolution",
            feature,
            cell
        );
    }
    needed.clamp(1, MAX_SUBSAMPLES)
}

fn voxel_surface(node: &CsgNode, grid: &SampleGrid) -> Vec<stl_io::Triangle> {
    let n = subsamples(node, grid);
    let offsets: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) / n as f64).collect();
    let occupied_cell = |[i, j, k]: [usize; 3]| -> bool {
        let corner = grid.corner(i, j, k);
        offsets.iter().any(|&w| {
            offsets.iter().any(|&v| {
                offsets
                    .iter()
                    .any(|&u| node.contains(corner + grid.cell * DVec3::new(u, v, w)))
            })
        })
    };

    let mut occupied = Vec::with_capacity(grid.len());
    occupied.extend(grid.cells().map(|(cell, _)| occupied_cell(cell)));

    let dims = grid.dims;
    let filled = |cell: [isize; 3]| -> bool {
        if (0..3).any(|a| cell[a] < 0 || cell[a] >= dims[a] as isize) {
            return false;
        }
        occupied[grid.index(cell[0] as usize, cell[1] as usize, cell[2] as usize)]
    };

    let mut triangles = Vec::new();
    for (cell, _) in grid.cells() {
        if !occupied[grid.index(cell[0], cell[1], cell[2])] {
            continue;
        }
        let signed = cell.map(|c| c as isize);
        for axis in 0..3 {
            for outward in [false, true] {
                let mut neighbor = signed;
                neighbor[axis] += if outward { 1 } else { -1 };
                if !filled(neighbor) {
                    push_face(&mut triangles, grid, cell, axis, outward);
                }
            }
        }
    }
    triangles
}

/// Two triangles for the cell face normal to `axis`, wound counter-clockwise from outside
fn push_face(
    triangles: &mut Vec<stl_io::Triangle>,
    grid: &SampleGrid,
    cell: [usize; 3],
    axis: usize,
    outward: bool,
) {
    let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
    let mut base = cell;
    if outward {
        base[axis] += 1;
    }
    let corner = |du: usize, dv: usize| -> [f32; 3] {
        let mut c = base;
        c[u] += du;
        c[v] += dv;
        let p = grid.corner(c[0], c[1], c[2]);
        [p.x as f32, p.y as f32, p.z as f32]
    };

    let mut normal = DVec3::ZERO;
    normal[axis] = if outward { 1.0 } else { -1.0 };
    let normal = stl_io::Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]);

    let quad = [corner(0, 0), corner(1, 0), corner(1, 1), corner(0, 1)];
    let order: [[usize; 3]; 2] = if outward {
        [[0, 1, 2], [0, 2, 3]]
    } else {
        [[0, 2, 1], [0, 3, 2]]
    };
    for tri in order {
        triangles.push(stl_io::Triangle {
            normal,
            vertices: tri.map(|i| stl_io::Vertex::new(quad[i])),
        });
    }
}
