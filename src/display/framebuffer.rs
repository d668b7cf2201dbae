use super::{Display, DisplayError};

/// A display that keeps the last frame in memory. Stands in for the watch screen on the host.
#[derive(Debug)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    color_depth: u8,
    powered: bool,
    frame: Vec<u8>,
    frames_drawn: usize,
}

impl Framebuffer {
    pub const SCREEN_WIDTH: usize = 144;
    pub const SCREEN_HEIGHT: usize = 168;

    pub fn new() -> Self {
        Self::with_dimensions(Self::SCREEN_WIDTH, Self::SCREEN_HEIGHT, 2)
    }

    pub fn with_dimensions(width: usize, height: usize, color_depth: u8) -> Self {
        Self {
            width,
            height,
            color_depth,
            powered: false,
            frame: vec![0; width * height],
            frames_drawn: 0,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width {
            self.frame.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames_drawn
    }

    pub fn is_on(&self) -> bool {
        self.powered
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Framebuffer {
    type Err = DisplayError;

    fn on(&mut self) -> Result<(), Self::Err> {
        self.powered = true;
        Ok(())
    }

    fn off(&mut self) -> Result<(), Self::Err> {
        self.frame.iter_mut().for_each(|pixel| *pixel = 0);
        self.powered = false;
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), Self::Err> {
        self.powered = false;
        Ok(())
    }

    fn draw(&mut self, image: impl IntoIterator<Item = u8>) -> Result<(), Self::Err> {
        if !self.powered {
            return Err(DisplayError::PoweredOff);
        }

        let frame: Vec<u8> = image.into_iter().collect();
        if frame.len() != self.width * self.height {
            return Err(DisplayError::FrameSize {
                expected: self.width * self.height,
                actual: frame.len(),
            });
        }

        self.frame = frame;
        self.frames_drawn += 1;
        Ok(())
    }

    fn get_dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn get_color_depth(&self) -> u8 {
        self.color_depth
    }
}
