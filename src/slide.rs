use std::rc::Rc;
use std::time::Duration;

use raylib::prelude::*;

/// The surface the slideshow draws into.
///
/// The image is drawn CENTER_CROP into a rectangle `inset` pixels wider than
/// the screen on both sides, so sliding by up to `inset` never shows an edge.
pub struct SlideSurface {
    current: Option<Rc<Texture2D>>,
    outgoing: Option<Rc<Texture2D>>,
    fade_timer: f32,
    fade_duration: f32,
    inset: f32,
}

impl SlideSurface {
    pub fn new(inset: f32) -> Self {
        Self {
            current: None,
            outgoing: None,
            fade_timer: 0.0,
            fade_duration: 0.0,
            inset,
        }
    }

    pub fn set_inset(&mut self, inset: f32) {
        self.inset = inset.max(0.0);
    }

    /// Replaces the content, crossfading from whatever was shown before.
    pub fn show(&mut self, texture: Rc<Texture2D>, crossfade: Duration) {
        self.outgoing = self.current.replace(texture);
        self.fade_timer = 0.0;
        self.fade_duration = crossfade.as_secs_f32();
        if self.fade_duration <= 0.0 {
            self.outgoing = None;
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.outgoing.is_none() {
            return;
        }
        self.fade_timer += dt;
        if self.fade_timer >= self.fade_duration {
            self.outgoing = None;
        }
    }

    /// Opacity of the incoming image.
    fn fade_in(&self) -> f32 {
        if self.outgoing.is_none() {
            1.0
        } else {
            (self.fade_timer / self.fade_duration).clamp(0.0, 1.0)
        }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle, offset: f32) {
        let screen_width = d.get_screen_width() as f32;
        let screen_height = d.get_screen_height() as f32;
        let dest = Rectangle::new(
            offset - self.inset,
            0.0,
            screen_width + self.inset * 2.0,
            screen_height,
        );

        let alpha = self.fade_in();
        if let Some(texture) = &self.outgoing {
            draw_cropped(d, texture, dest, 1.0 - alpha);
        }
        if let Some(texture) = &self.current {
            draw_cropped(d, texture, dest, alpha);
        }
    }
}

fn draw_cropped(d: &mut RaylibDrawHandle, texture: &Texture2D, dest: Rectangle, alpha: f32) {
    let source = center_crop(texture.width() as f32, texture.height() as f32, dest.width, dest.height);
    let tint = Color::new(255, 255, 255, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8);
    d.draw_texture_pro(texture, source, dest, Vector2::new(0.0, 0.0), 0.0, tint);
}

/// Largest centered region of the texture with the destination's aspect ratio.
pub fn center_crop(tex_width: f32, tex_height: f32, dest_width: f32, dest_height: f32) -> Rectangle {
    if tex_width <= 0.0 || tex_height <= 0.0 || dest_width <= 0.0 || dest_height <= 0.0 {
        return Rectangle::new(0.0, 0.0, tex_width.max(0.0), tex_height.max(0.0));
    }

    let scale = (dest_width / tex_width).max(dest_height / tex_height);
    let crop_width = dest_width / scale;
    let crop_height = dest_height / scale;
    Rectangle::new(
        (tex_width - crop_width) * 0.5,
        (tex_height - crop_height) * 0.5,
        crop_width,
        crop_height,
    )
}
