use bytemuck::NoUninit;
use glam::Vec3;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Append another mesh, rebasing its indices.
    pub fn append(&mut self, other: Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| base + i));
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Flat ground square centered on the origin, checkered in two greens so
/// motion is visible while walking.
pub fn create_ground_mesh(half_extent: i32, cell: f32) -> Mesh {
    let mut mesh = Mesh::default();
    for gx in -half_extent..half_extent {
        for gz in -half_extent..half_extent {
            let color = if (gx + gz).rem_euclid(2) == 0 {
                [0.30, 0.55, 0.25, 1.0]
            } else {
                [0.24, 0.45, 0.20, 1.0]
            };
            let x0 = gx as f32 * cell;
            let z0 = gz as f32 * cell;
            let base = mesh.vertices.len() as u32;
            for (x, z) in [(x0, z0), (x0 + cell, z0), (x0 + cell, z0 + cell), (x0, z0 + cell)] {
                mesh.vertices.push(Vertex {
                    pos: [x, 0.0, z],
                    normal: [0.0, 1.0, 0.0],
                    color,
                });
            }
            mesh.indices.extend([base, base + 2, base + 1, base, base + 3, base + 2]);
        }
    }
    mesh
}

/// Axis-aligned box, used for prop entities.
pub fn create_box_mesh(center: Vec3, half: Vec3, color: [f32; 4]) -> Mesh {
    let (cx, cy, cz) = (center.x, center.y, center.z);
    let (hx, hy, hz) = (half.x, half.y, half.z);

    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]]),
        ([0.0, 0.0, -1.0], [[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]]),
        ([1.0, 0.0, 0.0], [[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]]),
        ([-1.0, 0.0, 0.0], [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]]),
        ([0.0, 1.0, 0.0], [[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]]),
        ([0.0, -1.0, 0.0], [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]]),
    ];

    let mut mesh = Mesh::default();
    for (normal, corners) in faces {
        let base = mesh.vertices.len() as u32;
        for corner in corners {
            mesh.vertices.push(Vertex {
                pos: [cx + corner[0], cy + corner[1], cz + corner[2]],
                normal,
                color,
            });
        }
        mesh.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_mesh_covers_the_grid() {
        let mesh = create_ground_mesh(2, 4.0);
        // 4x4 cells, one quad each
        assert_eq!(mesh.vertices.len(), 16 * 4);
        assert_eq!(mesh.indices.len(), 16 * 6);
        assert!(mesh.vertices.iter().all(|v| v.pos[1] == 0.0));
    }

    #[test]
    fn test_box_mesh_has_six_faces() {
        let mesh = create_box_mesh(Vec3::ZERO, Vec3::ONE, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut a = create_box_mesh(Vec3::ZERO, Vec3::ONE, [1.0; 4]);
        let b = create_box_mesh(Vec3::X * 4.0, Vec3::ONE, [1.0; 4]);
        a.append(b);
        assert_eq!(a.vertices.len(), 48);
        assert_eq!(*a.indices.iter().max().unwrap(), 47);
    }
}
