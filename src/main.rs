use lucent_ngin::{scene::default_scene, SceneConfig};

fn main() -> anyhow::Result<()> {
    lucent_ngin::run(SceneConfig::default(), default_scene())
}
