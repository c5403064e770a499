/// Channel layout of a float texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureLayout {
    Rgba, // colour targets and uploaded patterns
    Rg,   // shadow moments: distance, distance squared
}

impl TextureLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgba => 4,
            Self::Rg => 2,
        }
    }
}

/// A flat float payload produced by a texture generator.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub name: String,
    pub pixels: Vec<f32>,
    pub width: u32,
    pub height: u32,
    pub layout: TextureLayout,
}

impl TextureData {
    pub fn rgba(name: impl Into<String>, width: u32, height: u32, pixels: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            pixels,
            width,
            height,
            layout: TextureLayout::Rgba,
        }
    }

    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.layout.channels()
    }

    pub fn is_complete(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }
}
