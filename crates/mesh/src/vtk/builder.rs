// internal modules
use crate::vtk::TopologyToVtk;

// external crates
use vtkio::model::ByteOrder;

/// Builder implementation for TopologyToVtk configuration
///
/// The fields of [TopologyToVtk] are left public for direct use but the module
/// also implements a builder.
///
/// Any number of parameters can be set this way (including none). To get the
/// final [TopologyToVtk] from the builder, call
/// [build()](TopologyToVtkBuilder::build).
///
/// ```rust
/// # use ffeatools_mesh::vtk::TopologyToVtk;
/// # use vtkio::model::ByteOrder;
/// let converter = TopologyToVtk::builder()
///     .include_location(false)
///     .include_size(true)
///     .byte_order(ByteOrder::LittleEndian)
///     .build();
///
/// assert!(converter.include_size);
/// ```
pub struct TopologyToVtkBuilder {
    /// Byte ordering as big or little endian
    byte_order: ByteOrder,
    /// Include the surface/interior tag as cell data
    include_location: bool,
    /// Include element volume or face area as cell data
    include_size: bool,
}

impl TopologyToVtkBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [TopologyToVtk] type
    pub fn build(self) -> TopologyToVtk {
        TopologyToVtk {
            byte_order: self.byte_order,
            include_location: self.include_location,
            include_size: self.include_size,
        }
    }

    /// Set the byte ordering
    ///
    /// Defaults to big endian, which every plotting tool reads.
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Include the surface/interior tag as a `location` cell array
    ///
    /// Enabled by default. Interior elements are `0`, surface elements `1` and
    /// unclassified elements `-1`. Surface faces are tagged with the index of
    /// their owning element instead.
    pub fn include_location(mut self, include: bool) -> Self {
        self.include_location = include;
        self
    }

    /// Include a `volume` (elements) or `area` (faces) cell array
    pub fn include_size(mut self, include: bool) -> Self {
        self.include_size = include;
        self
    }
}

impl Default for TopologyToVtkBuilder {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::BigEndian,
            include_location: true,
            include_size: false,
        }
    }
}
