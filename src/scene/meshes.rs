use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Plane,
    Sphere,
    Cylinder,
    Torus,
    Prism,
    Box,
}

impl MeshKind {
    pub const ALL: [MeshKind; 6] = [
        MeshKind::Plane,
        MeshKind::Sphere,
        MeshKind::Cylinder,
        MeshKind::Torus,
        MeshKind::Prism,
        MeshKind::Box,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MeshKind::Plane => "plane",
            MeshKind::Sphere => "sphere",
            MeshKind::Cylinder => "cylinder",
            MeshKind::Torus => "torus",
            MeshKind::Prism => "prism",
            MeshKind::Box => "box",
        }
    }
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Makes a mesh kind available for drawing. Loading a kind twice is a no-op.
pub trait MeshLoader {
    fn load_mesh(&mut self, kind: MeshKind) -> anyhow::Result<()>;
}

/// Draws a mesh with whatever uniform state is current.
pub trait MeshDrawer {
    fn draw_mesh(&mut self, kind: MeshKind);
}
