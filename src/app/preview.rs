use crate::upload::SelectedFile;
use eframe::egui;
use image::GenericImageView;

/// Produces a displayable preview for a selected file.
///
/// The returned handle owns whatever resource backs the preview and releases
/// it when dropped.
pub trait PreviewRenderer {
    type Preview;

    fn create_preview(&mut self, file: &SelectedFile) -> Option<Self::Preview>;
}

pub struct ImagePreview {
    texture: egui::TextureHandle,
    size: egui::Vec2,
}

impl ImagePreview {
    pub fn texture_id(&self) -> egui::TextureId {
        self.texture.id()
    }

    pub fn size(&self) -> egui::Vec2 {
        self.size
    }
}

pub struct TexturePreviews {
    ctx: egui::Context,
    max_dimension: f32,
}

impl TexturePreviews {
    pub fn new(ctx: egui::Context, max_dimension: f32) -> Self {
        Self { ctx, max_dimension }
    }
}

impl PreviewRenderer for TexturePreviews {
    type Preview = ImagePreview;

    fn create_preview(&mut self, file: &SelectedFile) -> Option<ImagePreview> {
        let decoded = match image::load_from_memory(&file.bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(file = %file.file_name, error = %e, "could not decode preview");
                return None;
            }
        };

        let (orig_w, orig_h) = decoded.dimensions();
        let scale = (self.max_dimension / (orig_w.max(orig_h) as f32)).min(1.0);
        let resized = if scale < 1.0 {
            decoded.resize(
                (orig_w as f32 * scale).max(1.0) as u32,
                (orig_h as f32 * scale).max(1.0) as u32,
                image::imageops::FilterType::Triangle,
            )
        } else {
            decoded
        };

        let rgba = resized.to_rgba8();
        let [w, h] = [rgba.width() as usize, rgba.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied([w, h], rgba.as_raw());
        let texture = self.ctx.load_texture(
            format!("photo-preview:{}", file.file_name),
            color_image,
            egui::TextureOptions::LINEAR,
        );

        Some(ImagePreview {
            texture,
            size: egui::vec2(w as f32, h as f32),
        })
    }
}
