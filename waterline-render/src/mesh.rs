//! Water surface geometry: a flat tiled grid, displaced on the GPU.

use glam::Vec3;
use waterline_gpu_shared::Vertex;
use wgpu::util::DeviceExt;

use crate::settings::WaterSettings;

/// CPU-side water grid.
#[derive(Clone, Debug, Default)]
pub struct WaterGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// One flat triangle with its own three vertices and face normal.
fn push_triangle(grid: &mut WaterGrid, points: [Vec3; 3], color: Vec3) {
    let normal = (points[1] - points[0])
        .cross(points[2] - points[0])
        .normalize_or_zero();

    let base = grid.vertices.len() as u32;
    grid.vertices
        .extend(points.iter().map(|&p| Vertex::new(p, normal, color)));
    grid.indices.extend([base, base + 1, base + 2]);
}

impl WaterGrid {
    /// `tiles_count`² quads of `tile_size` at height `level`, starting at the origin
    /// and extending along +X and +Z. Triangles do not share vertices.
    pub fn generate(settings: &WaterSettings) -> Self {
        let n = settings.tiles_count as usize;
        let mut grid = WaterGrid {
            vertices: Vec::with_capacity(n * n * 6),
            indices: Vec::with_capacity(n * n * 6),
        };

        let step = settings.tile_size;
        for x in 0..settings.tiles_count {
            for z in 0..settings.tiles_count {
                let v1 = Vec3::new(x as f32 * step, settings.level, z as f32 * step);
                let v2 = v1 + Vec3::X * step;
                let v3 = v2 + Vec3::Z * step;
                let v4 = v1 + Vec3::Z * step;

                // Wound so face normals point +Y.
                push_triangle(&mut grid, [v1, v4, v3], settings.color);
                push_triangle(&mut grid, [v1, v3, v2], settings.color);
            }
        }

        grid
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Uploaded vertex and index buffers.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded mesh '{label}': {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    pub fn from_grid(device: &wgpu::Device, grid: &WaterGrid) -> Self {
        Self::upload(device, "Water Grid", &grid.vertices, &grid.indices)
    }
}
