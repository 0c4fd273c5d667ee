use voxlight_world::ChunkCoord;

/// Receives the chunks whose meshes need rebuilding after a light pass.
pub trait RemeshSink {
    fn request_remesh(&mut self, coord: ChunkCoord);
}

impl RemeshSink for Vec<ChunkCoord> {
    fn request_remesh(&mut self, coord: ChunkCoord) {
        self.push(coord);
    }
}
