use std::f32::consts::PI;

use crate::alg;
use crate::config::{CameraSettings, RendererConfig};
use crate::error::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Viewport {
        Viewport { width, height }
    }

    pub fn validate(self) -> Result<Viewport> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidViewport(self));
        }

        Ok(self)
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Frustum projection fitted to the viewport's aspect ratio
pub fn projection(viewport: Viewport, camera: &CameraSettings) -> Result<alg::Mat4> {
    let ratio = viewport.validate()?.aspect();

    let top = (camera.fov * PI / 360.).tan() * camera.near;
    let bottom = -top;
    let left = ratio * bottom;
    let right = ratio * top;

    Ok(alg::Mat4::perspective_frustum(
        left,
        right,
        bottom,
        top,
        camera.near,
        camera.far,
    ))
}

/// Spinning cube state, advanced once per rendered frame
pub struct Scene {
    camera: CameraSettings,
    model_offset: alg::Vec3,
    spin_axis: alg::Vec3,
    increment: f32,
    angle: f32,
}

impl Scene {
    pub fn new(config: &RendererConfig) -> Scene {
        Scene {
            camera: config.camera,
            model_offset: config.model_offset,
            spin_axis: config.spin_axis,
            increment: config.angle_increment,
            angle: 0.,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn camera(&self) -> &CameraSettings {
        &self.camera
    }

    pub fn view(&self) -> Result<alg::Mat4> {
        let view = alg::Mat4::look_at(
            self.camera.eye,
            self.camera.target,
            self.camera.up,
        )?;

        Ok(view)
    }

    pub fn model(&self) -> alg::Mat4 {
        // Spins at twice the stored angle
        alg::Mat4::translation_vec(self.model_offset)
            * alg::Mat4::rotation(
                2. * self.angle,
                self.spin_axis.x,
                self.spin_axis.y,
                self.spin_axis.z,
            )
    }

    /// Model-view-projection for the current angle
    pub fn transform(&self, projection: &alg::Mat4) -> Result<alg::Mat4> {
        let model_view = self.view()? * self.model();
        Ok(*projection * model_view)
    }

    pub fn advance(&mut self) {
        self.angle += self.increment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn empty_viewport() {
        let camera = CameraSettings::default();

        for viewport in &[Viewport::new(0, 10), Viewport::new(10, 0)] {
            match projection(*viewport, &camera) {
                Err(Error::InvalidViewport(v)) => assert!(v == *viewport),
                _ => panic!("expected viewport error"),
            }
        }
    }

    #[test]
    fn projection_matches_frustum() {
        let camera = CameraSettings::default();
        let viewport = Viewport::new(1920, 1080);
        let mat = projection(viewport, &camera).unwrap();

        let top = (camera.fov * PI / 360.).tan() * camera.near;
        let expected = alg::Mat4::perspective_frustum(
            viewport.aspect() * -top,
            viewport.aspect() * top,
            -top,
            top,
            camera.near,
            camera.far,
        );

        assert!(mat == expected);

        // Symmetric frustum: no skew terms
        assert_eq!(mat.get(0, 2), 0.);
        assert_eq!(mat.get(1, 2), 0.);
    }

    #[test]
    fn model_at_rest() {
        let scene = Scene::new(&RendererConfig::default());
        let model = scene.model();

        assert!(model == alg::Mat4::translation(0., -0.5, -1.5));
    }

    #[test]
    fn advance_accumulates() {
        let config = RendererConfig::default();
        let mut scene = Scene::new(&config);

        for _ in 0..10 {
            scene.advance();
        }

        let error = (scene.angle() - 10. * config.angle_increment).abs();
        eprintln!("Error: {}", error);
        assert!(error < EPSILON);

        // Rotation is applied at twice the angle
        let expected = alg::Mat4::translation(0., -0.5, -1.5)
            * alg::Mat4::rotation(2. * scene.angle(), 0., 1., 1.);

        assert!(scene.model() == expected);
    }

    #[test]
    fn cube_is_visible() {
        let scene = Scene::new(&RendererConfig::default());
        let projection = projection(Viewport::new(1000, 500), scene.camera())
            .unwrap();

        // Cube center in eye space
        let view_model = scene.view().unwrap() * scene.model();
        let eye = view_model * alg::Vec4::new(0., 0., 0., 1.);

        assert!((eye.z + 8.5).abs() < EPSILON);

        let clip = scene.transform(&projection).unwrap()
            * alg::Vec4::new(0., 0., 0., 1.);

        assert!(clip.w > 0.);

        let ndc = alg::Vec3::from(clip) / clip.w;
        assert!(ndc.x.abs() <= 1.);
        assert!(ndc.y.abs() <= 1.);
        assert!(ndc.z.abs() <= 1.);
    }

    #[test]
    fn degenerate_camera() {
        let mut config = RendererConfig::default();
        config.camera.target = config.camera.eye;

        let scene = Scene::new(&config);
        assert!(matches!(scene.view(), Err(Error::Math(_))));
    }
}
