use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use subway_epd_common::*;

const IMAGE_NAME: &str = "current_display.pbm";

/// 把墨水屏画面写成 PBM 图片的模拟屏
///
/// 保存一份与真实面板一致的画面：整屏写入替换全部像素，局部写入只覆盖给定区域。
pub struct PbmDisplay {
    path: PathBuf,
    panel: Bitmap,
}

impl PbmDisplay {
    pub fn new(output_dir: impl AsRef<Path>, config: DisplayConfig) -> Result<Self, HardwareError> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).map_err(io_error)?;
        debug!("Simulated display writes to {}", output_dir.display());
        Ok(Self {
            path: output_dir.join(IMAGE_NAME),
            panel: Bitmap::new(config.width, config.height),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), HardwareError> {
        // 先写临时文件再改名，外部查看器不会读到半张图
        let tmp = self.path.with_extension("pbm.tmp");
        let mut file = fs::File::create(&tmp).map_err(io_error)?;
        file.write_all(&encode_pbm(&self.panel)).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        fs::rename(&tmp, &self.path).map_err(io_error)
    }
}

impl EpdDisplay for PbmDisplay {
    fn write_full(&mut self, bitmap: &Bitmap, clear: bool) -> Result<(), HardwareError> {
        if (bitmap.width(), bitmap.height()) != (self.panel.width(), self.panel.height()) {
            return Err(HardwareError::SizeMismatch {
                width: self.panel.width(),
                height: self.panel.height(),
                actual_width: bitmap.width(),
                actual_height: bitmap.height(),
            });
        }
        if clear {
            debug!("Clearing simulated panel");
            self.panel.fill(Color::White);
        }
        self.panel.clone_from(bitmap);
        self.persist()
    }

    fn write_partial(&mut self, bitmap: &Bitmap, region: Rect) -> Result<(), HardwareError> {
        if !region.fits_within(self.panel.width(), self.panel.height())
            || !region.fits_within(bitmap.width(), bitmap.height())
        {
            return Err(HardwareError::InvalidRegion(region));
        }
        self.panel.paste(bitmap, region);
        self.persist()
    }
}

fn io_error(e: std::io::Error) -> HardwareError {
    HardwareError::Io(e.to_string())
}

/// 编码为二进制 PBM（P4）：每行按位打包，高位在前，1 表示黑
fn encode_pbm(bitmap: &Bitmap) -> Vec<u8> {
    let width = bitmap.width() as usize;
    let row_bytes = width.div_ceil(8);
    let header = format!("P4\n{} {}\n", bitmap.width(), bitmap.height());

    let mut out = Vec::with_capacity(header.len() + row_bytes * bitmap.height() as usize);
    out.extend_from_slice(header.as_bytes());

    if width == 0 {
        return out;
    }
    for row in bitmap.buffer().chunks(width) {
        let mut packed = vec![0u8; row_bytes];
        for (x, &pixel) in row.iter().enumerate() {
            if pixel == Color::Black.as_byte() {
                packed[x / 8] |= 0x80 >> (x % 8);
            }
        }
        out.extend_from_slice(&packed);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DisplayConfig {
        DisplayConfig {
            width: 10,
            height: 4,
        }
    }

    #[test]
    fn pbm_rows_are_bit_packed() {
        let mut bitmap = Bitmap::new(10, 2);
        bitmap.set(0, 0, Color::Black);
        bitmap.set(9, 0, Color::Black);
        bitmap.set(1, 1, Color::Black);

        let encoded = encode_pbm(&bitmap);
        let header = b"P4\n10 2\n";
        assert_eq!(&encoded[..header.len()], header);
        assert_eq!(&encoded[header.len()..], &[0x80, 0x40, 0x40, 0x00]);
    }

    #[test]
    fn full_write_persists_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = PbmDisplay::new(dir.path().join("out"), config()).unwrap();

        let mut bitmap = Bitmap::new(10, 4);
        bitmap.fill(Color::Black);
        display.write_full(&bitmap, true).unwrap();

        let written = fs::read(display.path()).unwrap();
        assert_eq!(written, encode_pbm(&bitmap));
        assert_eq!(&display.panel, &bitmap);
    }

    #[test]
    fn partial_write_only_touches_region() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = PbmDisplay::new(dir.path(), config()).unwrap();

        let mut bitmap = Bitmap::new(10, 4);
        bitmap.fill(Color::Black);
        display
            .write_partial(&bitmap, Rect::new(2, 1, 3, 2))
            .unwrap();

        let panel = &display.panel;
        assert_eq!(panel.get(2, 1), Some(Color::Black));
        assert_eq!(panel.get(4, 2), Some(Color::Black));
        assert_eq!(panel.get(5, 2), Some(Color::White));
        assert_eq!(panel.get(0, 0), Some(Color::White));
        assert_eq!(fs::read(display.path()).unwrap(), encode_pbm(panel));
    }

    #[test]
    fn rejects_bad_sizes_and_regions() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = PbmDisplay::new(dir.path(), config()).unwrap();

        let err = display.write_full(&Bitmap::new(8, 4), false).unwrap_err();
        assert!(matches!(err, HardwareError::SizeMismatch { actual_width: 8, .. }));

        let region = Rect::new(8, 0, 4, 1);
        assert_eq!(
            display.write_partial(&Bitmap::new(10, 4), region),
            Err(HardwareError::InvalidRegion(region))
        );
        assert!(!display.path().exists());
    }
}
