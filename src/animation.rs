// Sprite sheet animation

use crate::assets::{AssetCache, TextureHandle};
use macroquad::prelude::*;

/// Default playback speed in frames per second.
pub const DEFAULT_ANIMATION_SPEED: f32 = 15.0;

/// A grid of animation frames inside a sub-region of an atlas texture.
///
/// The frame index is fractional and advances with time. The region is
/// normalised to the atlas size, so one texture can hold a row block per
/// facing direction.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    texture: TextureHandle,
    /// Atlas size in pixels
    atlas_size: Vec2,
    rows: u32,
    columns: u32,
    /// Normalised `[0, 1]` sub-rectangle holding the frames
    pub region: Rect,
    /// Frames per second
    pub speed: f32,
    pub looping: bool,
    index: f32,
}

impl SpriteSheet {
    pub fn new(texture: TextureHandle, atlas_size: Vec2, rows: u32, columns: u32, region: Rect) -> Self {
        Self {
            texture,
            atlas_size,
            rows: rows.max(1),
            columns: columns.max(1),
            region,
            speed: DEFAULT_ANIMATION_SPEED,
            looping: true,
            index: 0.0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Play once and hold the last frame.
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn frame_count(&self) -> u32 {
        self.rows * self.columns
    }

    /// Fractional playback position.
    pub fn position(&self) -> f32 {
        self.index
    }

    /// Whole frame index, before the finished clamp.
    pub fn index(&self) -> u32 {
        self.index.floor() as u32
    }

    /// Wraps when looping, clamps to `[0, frames]` otherwise.
    pub fn set_index(&mut self, index: f32) {
        let max = self.frame_count() as f32;
        self.index = if self.looping {
            index.rem_euclid(max)
        } else {
            index.clamp(0.0, max)
        };
        // rem_euclid can round up to max for tiny negative inputs
        if self.looping && self.index >= max {
            self.index = 0.0;
        }
    }

    pub fn increment(&mut self, dt: f32) {
        self.set_index(self.index + dt * self.speed);
    }

    pub fn has_finished(&self) -> bool {
        !self.looping && self.index() >= self.frame_count()
    }

    /// Frame being shown. A finished one-shot sheet holds its last frame.
    pub fn frame(&self) -> u32 {
        if self.has_finished() {
            self.index() - 1
        } else {
            self.index()
        }
    }

    /// Select one of `blocks` equal row blocks of the atlas.
    pub fn set_facing_block(&mut self, block: u32, blocks: u32) {
        self.region.y = block as f32 / blocks.max(1) as f32;
    }

    /// Pixel size of one frame.
    pub fn frame_size(&self) -> Vec2 {
        vec2(
            (self.region.w * self.atlas_size.x / self.columns as f32).trunc(),
            (self.region.h * self.atlas_size.y / self.rows as f32).trunc(),
        )
    }

    /// Source rectangle of the current frame in atlas pixels.
    pub fn source_rect(&self) -> Rect {
        let size = self.frame_size();
        let offset = vec2(
            (self.region.x * self.atlas_size.x).trunc(),
            (self.region.y * self.atlas_size.y).trunc(),
        );
        let frame = self.frame();
        let row = frame / self.columns;
        let column = frame % self.columns;

        Rect::new(
            offset.x + size.x * column as f32,
            offset.y + size.y * row as f32,
            size.x,
            size.y,
        )
    }

    /// Draw the current frame centred on `centre`.
    pub fn draw(&self, assets: &AssetCache, centre: Vec2, scale: f32) {
        let Some(tex) = assets.texture(self.texture) else {
            return;
        };
        let dest = self.frame_size() * scale;
        let top_left = centre - dest * 0.5;

        draw_texture_ex(
            tex,
            top_left.x,
            top_left.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(dest),
                source: Some(self.source_rect()),
                ..Default::default()
            },
        );
    }
}
