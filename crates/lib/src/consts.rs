/// Directory name used for the build folder when it would coincide with the source.
pub const DEFAULT_BUILD_DIR: &str = "build";

// Source directory markers
pub const MANIFEST_FILE: &str = "conanfile.txt";
pub const BUILD_DESCRIPTOR_FILE: &str = "CMakeLists.txt";

// Build directory markers
pub const BUILD_INFO_FILE: &str = "conanbuildinfo.cmake";
pub const BUILD_SCRIPT_FILE: &str = "Makefile";
pub const ACTIVATE_SCRIPT: &str = "activate.sh";
pub const BINARY_NAME_FILE: &str = "binary.txt";

// Toolchain overrides
pub const CONAN_ENV: &str = "INCLUDEOS_CONAN";
pub const CMAKE_ENV: &str = "INCLUDEOS_CMAKE";
pub const BOOT_ENV: &str = "INCLUDEOS_BOOT";
pub const SHELL_ENV: &str = "INCLUDEOS_SHELL";
