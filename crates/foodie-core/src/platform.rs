use std::path::PathBuf;

pub fn config_dir() -> PathBuf {
    // On macOS and Linux, always use ~/.config/foodie/
    // (avoid macOS Application Support folder for consistency)
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("foodie")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("foodie")
    }
}

pub fn data_dir() -> PathBuf {
    // ~/.local/share/foodie/ on unix (XDG standard)
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("foodie")
    }

    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("foodie")
    }
}
