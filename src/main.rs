//! Headless particle run.
//!
//! Usage: `billboard-particles [template.json] [seconds]`
//!
//! Runs a particle system at 60 Hz into a CPU mesh and logs pool and buffer
//! sizes once per simulated second. Set `RUST_LOG=debug` for per-change
//! detail.

use billboard_particles::prelude::*;
use billboard_particles::TemplateError;

const FRAMES_PER_SECOND: u32 = 60;

/// Frames to simulate, saturating for absurd durations.
fn frame_count(seconds: u32) -> u32 {
    seconds.saturating_mul(FRAMES_PER_SECOND)
}

fn main() -> Result<(), TemplateError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let template = match args.next() {
        Some(path) => ParticleTemplate::load(&path)?,
        None => ParticleTemplate::default(),
    };
    let seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(10);

    let context = LocalRenderContext::new();
    let mut mesh = CpuMesh::new();
    let mut camera = OrbitCamera::new();
    let mut system = ParticleSystem::new();
    system.create(template)?;

    for frame in 0..frame_count(seconds) {
        camera.orbit(0.005);
        let basis = camera.basis();
        system.tick(GATHER_STEP, &basis);
        system.gather(&context, 0, &basis, &mut mesh);

        if frame % FRAMES_PER_SECOND == FRAMES_PER_SECOND - 1 {
            let buffers = mesh.buffers();
            log::info!(
                "t={:>3}s particles={} vertices={} indices={} colors={}",
                (frame + 1) / FRAMES_PER_SECOND,
                system.pool().map_or(0, |p| p.len()),
                buffers.vertex_count(),
                buffers.index_count(),
                buffers.colors().len()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_saturates() {
        assert_eq!(frame_count(10), 600);
        assert_eq!(frame_count(u32::MAX), u32::MAX);
    }
}
