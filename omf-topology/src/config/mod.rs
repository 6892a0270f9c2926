mod topology;

pub use topology::TopologyConfiguration;
