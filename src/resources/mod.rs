/**
 * This module contains everything that produces data for the GPU: procedural
 * geometry, vertex buffer uploads and texture loading from external files.
 */
pub mod geometry;
pub mod mesh;
pub mod texture;
