//! Theme configuration for the desktop app

/// Color palette for the application
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub bg_gradient: &'static str,
    pub surface: &'static str,
    pub border: &'static str,
    pub border_accent: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub text_muted: &'static str,
    pub accent: &'static str,
    pub accent_soft: &'static str,
    pub accent_gradient: &'static str,
    pub danger: &'static str,
    pub success: &'static str,
}

/// The app ships a single dark palette.
pub const PALETTE: ColorPalette = ColorPalette {
    bg_gradient: "linear-gradient(135deg, #0a0e27 0%, #1a1f3a 50%, #0f1729 100%)",
    surface: "rgba(255, 255, 255, 0.03)",
    border: "rgba(255, 255, 255, 0.1)",
    border_accent: "rgba(102, 126, 234, 0.4)",
    text_primary: "#ffffff",
    text_secondary: "rgba(255, 255, 255, 0.7)",
    text_muted: "rgba(255, 255, 255, 0.5)",
    accent: "#667eea",
    accent_soft: "#a8b3ff",
    accent_gradient: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
    danger: "#f5576c",
    success: "#4ade80",
};
