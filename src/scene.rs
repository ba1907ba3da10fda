//! The demo scene: two gold solids in front, two water solids behind them
//! in the list.

use crate::{
    data_structures::object::{Material, RenderableObject},
    resources::geometry::{flatten, GeometryProvider, Icosahedron},
    transform::RotationSpec,
};

pub const GOLD: Material = Material {
    diffuse: [0.9, 0.8, 0.5],
    specular: [1.0, 1.0, 1.0],
    shininess: 32.0,
};

pub const WATER: Material = Material {
    diffuse: [0.4, 0.6, 1.0],
    specular: [0.8, 0.8, 1.0],
    shininess: 64.0,
};

fn icosahedron(name: &str, center: [f32; 3], radius: f32, material: Material) -> RenderableObject {
    let arrays = flatten(&Icosahedron::new(center, radius).generate());
    RenderableObject::from_triangles(name, arrays, material, None)
}

/// Opaque objects first, translucent ones last.
pub fn default_scene() -> Vec<RenderableObject> {
    vec![
        icosahedron("gold-left", [-0.6, 0.0, 0.0], 0.7, GOLD),
        icosahedron("gold-top", [0.9, 0.9, -0.5], 0.5, GOLD)
            .with_rotation(RotationSpec::new(30.0, [0.0, 0.0, 1.0])),
        icosahedron("water-front", [0.3, 0.0, 0.5], 0.9, WATER)
            .with_rotation(RotationSpec::new(20.0, [1.0, 1.0, 0.0]))
            .translucent(),
        icosahedron("water-low", [-0.9, -1.0, 0.0], 0.5, WATER).translucent(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{misplaced_objects, split_groups};

    #[test]
    fn translucent_objects_sit_in_the_second_half() {
        let scene = default_scene();
        assert_eq!(scene.len(), 4);
        assert!(misplaced_objects(&scene).is_empty());

        let (opaque, translucent) = split_groups(&scene);
        assert!(opaque.iter().all(|o| o.material == GOLD));
        assert!(translucent.iter().all(|o| o.material == WATER));
    }

    #[test]
    fn every_object_is_a_full_icosahedron() {
        for object in default_scene() {
            assert_eq!(object.vertex_count(), 60, "{}", object.name);
            assert_eq!(object.tex_coords.len(), 60);
            assert!(object.buffers().is_none());
        }
    }
}
